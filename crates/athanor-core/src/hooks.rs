//! Serialize/deserialize hooks attached to attribute configurations.
//!
//! A hook is either one callable used for every format ([`FormatHook::Uniform`])
//! or a per-format mapping ([`FormatHook::PerFormat`]). A per-format mapping
//! need not cover every format: formats it omits fall back to the
//! dispatcher's type-based default.

use crate::format::Format;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Error returned by a hook callable.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by a hook callable.
pub type HookResult = Result<Value, HookError>;

/// A shareable value conversion callable.
///
/// # Examples
///
/// ```
/// use athanor_core::{Hook, Value};
///
/// let upper = Hook::new(|value: &Value| Ok(Value::from(value.to_string().to_uppercase())));
/// assert_eq!(upper.call(&Value::from("abc")).unwrap(), Value::from("ABC"));
/// ```
#[derive(Clone)]
pub struct Hook(Arc<dyn Fn(&Value) -> HookResult + Send + Sync>);

impl Hook {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&Value) -> HookResult + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn call(&self, value: &Value) -> HookResult {
		(self.0)(value)
	}
}

impl fmt::Debug for Hook {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Hook({:p})", Arc::as_ptr(&self.0) as *const ())
	}
}

/// Two hooks are equal when they share the same callable.
impl PartialEq for Hook {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
	}
}

/// A hook for every format, or one per format.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatHook {
	Uniform(Hook),
	PerFormat(BTreeMap<Format, Hook>),
}

impl FormatHook {
	/// One callable for every format.
	pub fn uniform<F>(f: F) -> Self
	where
		F: Fn(&Value) -> HookResult + Send + Sync + 'static,
	{
		FormatHook::Uniform(Hook::new(f))
	}

	/// A per-format mapping built from `(format, hook)` pairs.
	pub fn per_format(hooks: impl IntoIterator<Item = (Format, Hook)>) -> Self {
		FormatHook::PerFormat(hooks.into_iter().collect())
	}

	/// The callable to use for `format`, if this hook covers it.
	pub fn for_format(&self, format: Format) -> Option<&Hook> {
		match self {
			FormatHook::Uniform(hook) => Some(hook),
			FormatHook::PerFormat(hooks) => hooks.get(&format),
		}
	}
}

impl From<Hook> for FormatHook {
	fn from(hook: Hook) -> Self {
		FormatHook::Uniform(hook)
	}
}
