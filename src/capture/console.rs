//! The host's six logging entry points.

use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock, Weak};

use crate::event::{build_table_event, CaptureContext, ConsoleMethod};
use crate::render::render_table;
use crate::serialize::stringify_any;
use crate::value::Value;

use super::session::SessionInner;

/// One logging entry point.
pub type LogFn = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// A set of logging entry points that a capture session can wrap.
///
/// Cloning yields another handle to the same slots.
#[derive(Clone)]
pub struct ConsoleHost {
    inner: Arc<HostInner>,
}

struct HostInner {
    slots: RwLock<[LogFn; 6]>,
    active: Mutex<Weak<SessionInner>>,
}

impl ConsoleHost {
    /// Host whose entry points all forward to `f`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(ConsoleMethod, &[Value]) + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let slots = ConsoleMethod::ALL.map(|method| {
            let f = Arc::clone(&f);
            Arc::new(move |args: &[Value]| f(method, args)) as LogFn
        });

        Self {
            inner: Arc::new(HostInner {
                slots: RwLock::new(slots),
                active: Mutex::new(Weak::new()),
            }),
        }
    }

    /// Host printing to stdout, with warn and error going to stderr.
    pub fn stdio() -> Self {
        Self::from_fn(print_stdio)
    }

    /// Process-wide stdio host.
    pub fn global() -> &'static ConsoleHost {
        static GLOBAL: OnceLock<ConsoleHost> = OnceLock::new();
        GLOBAL.get_or_init(ConsoleHost::stdio)
    }

    /// Invoke the current entry point for `method`.
    pub fn call(&self, method: ConsoleMethod, args: &[Value]) {
        let slot = self.slot(method);
        slot(args);
    }

    pub fn log(&self, args: &[Value]) {
        self.call(ConsoleMethod::Log, args);
    }

    pub fn info(&self, args: &[Value]) {
        self.call(ConsoleMethod::Info, args);
    }

    pub fn warn(&self, args: &[Value]) {
        self.call(ConsoleMethod::Warn, args);
    }

    pub fn error(&self, args: &[Value]) {
        self.call(ConsoleMethod::Error, args);
    }

    pub fn debug(&self, args: &[Value]) {
        self.call(ConsoleMethod::Debug, args);
    }

    pub fn table(&self, args: &[Value]) {
        self.call(ConsoleMethod::Table, args);
    }

    pub(super) fn slot(&self, method: ConsoleMethod) -> LogFn {
        let slots = self.inner.slots.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&slots[method.index()])
    }

    pub(super) fn snapshot(&self) -> [LogFn; 6] {
        self.inner
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn replace_all(&self, slots: [LogFn; 6]) {
        *self.inner.slots.write().unwrap_or_else(PoisonError::into_inner) = slots;
    }

    pub(super) fn active(&self) -> std::sync::MutexGuard<'_, Weak<SessionInner>> {
        self.inner.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn print_stdio(method: ConsoleMethod, args: &[Value]) {
    match method {
        ConsoleMethod::Table => {
            let event = build_table_event(args, &CaptureContext::now());
            print!("{}", render_table(&event.table.columns, &event.table.rows));
        }
        ConsoleMethod::Warn | ConsoleMethod::Error => eprintln!("{}", join_args(args)),
        ConsoleMethod::Log | ConsoleMethod::Info | ConsoleMethod::Debug => {
            println!("{}", join_args(args))
        }
    }
}

fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(stringify_any)
        .collect::<Vec<_>>()
        .join(" ")
}
