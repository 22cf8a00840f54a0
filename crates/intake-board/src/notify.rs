//! Fire-and-forget user notifications ("toasts").

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
  #[default]
  Default,
  Destructive,
}

/// A single notification: short title, longer description, severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
  pub title:       String,
  pub description: String,
  pub severity:    Severity,
}

impl Toast {
  pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title:       title.into(),
      description: description.into(),
      severity:    Severity::Default,
    }
  }

  pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title:       title.into(),
      description: description.into(),
      severity:    Severity::Destructive,
    }
  }

  pub fn is_error(&self) -> bool { self.severity == Severity::Destructive }
}

/// Anything that can surface a [`Toast`] to the user. Delivery is
/// fire-and-forget; a notifier never fails.
pub trait Notifier {
  fn notify(&mut self, toast: Toast);
}

/// Collects toasts in order. Front-ends drain it when rendering.
impl Notifier for Vec<Toast> {
  fn notify(&mut self, toast: Toast) { self.push(toast); }
}
