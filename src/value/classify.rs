//! Closed classification of runtime values.

use super::{Object, Value};

/// The fixed set of shapes the serializer knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Primitive,
    Node,
    ErrorLike,
    DateLike,
    PatternLike,
    UrlLike,
    Binary,
    TypedArray,
    BlobLike,
    FormLike,
    MapLike,
    SetLike,
    RequestLike,
    ResponseLike,
    /// Plain objects and arrays: the generic walk.
    PlainObject,
}

pub fn classify(value: &Value) -> Shape {
    let Value::Object(obj) = value else {
        return Shape::Primitive;
    };
    match obj.object() {
        Object::Plain(_) | Object::Array(_) => Shape::PlainObject,
        Object::Error(_) => Shape::ErrorLike,
        Object::Date(_) => Shape::DateLike,
        Object::RegExp { .. } => Shape::PatternLike,
        Object::Url(_) => Shape::UrlLike,
        Object::ArrayBuffer { .. } => Shape::Binary,
        Object::TypedArray { .. } => Shape::TypedArray,
        Object::Blob(_) => Shape::BlobLike,
        Object::FormData(_) => Shape::FormLike,
        Object::Map(_) => Shape::MapLike,
        Object::Set(_) => Shape::SetLike,
        Object::Request(_) => Shape::RequestLike,
        Object::Response(_) => Shape::ResponseLike,
        Object::Node { .. } => Shape::Node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_and_callables_are_primitive() {
        assert_eq!(classify(&Value::Null), Shape::Primitive);
        assert_eq!(classify(&Value::Function(None)), Shape::Primitive);
        assert_eq!(classify(&Value::BigInt(7)), Shape::Primitive);
    }

    #[test]
    fn test_objects_map_to_their_shape() {
        assert_eq!(classify(&Value::array(Vec::new())), Shape::PlainObject);
        assert_eq!(classify(&Value::error("Error", "x")), Shape::ErrorLike);
        assert_eq!(classify(&Value::date(0.0)), Shape::DateLike);
        assert_eq!(classify(&Value::set(Vec::new())), Shape::SetLike);
    }
}
