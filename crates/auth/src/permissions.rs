use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Named permission, conventionally `"<app>.<action>_<model>"`
/// (e.g. `"hr.view_staff"`, `"finance.add_invoice"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The application prefix (`"hr"` for `"hr.view_staff"`).
    pub fn app_label(&self) -> Option<&str> {
        self.0.split_once('.').map(|(app, _)| app)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}
