use serde::Serialize;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
}

/// A user-visible notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub description: Option<String>,
}

/// Fire-and-forget notification sink
pub trait Notifier {
    fn notify(&self, toast: Toast);

    fn success(&self, title: &str, description: Option<&str>) {
        self.notify(Toast {
            level: ToastLevel::Success,
            title: title.to_string(),
            description: description.map(str::to_string),
        });
    }

    fn error(&self, title: &str, description: Option<&str>) {
        self.notify(Toast {
            level: ToastLevel::Error,
            title: title.to_string(),
            description: description.map(str::to_string),
        });
    }
}

/// Prints successes to stdout and errors to stderr
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, toast: Toast) {
        let line = match &toast.description {
            Some(desc) => format!("{} - {}", toast.title, desc),
            None => toast.title.clone(),
        };
        match toast.level {
            ToastLevel::Success => println!("{line}"),
            ToastLevel::Error => eprintln!("{line}"),
        }
    }
}

/// Keeps every toast in memory, in order
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    toasts: RefCell<Vec<Toast>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.borrow_mut().push(toast);
    }
}
