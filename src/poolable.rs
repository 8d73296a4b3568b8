//! Activation hooks for pooled objects

/// Host-side activation state of a pooled object.
///
/// The pool calls [`set_active`](Poolable::set_active) once with `true` on every
/// acquisition and once with `false` on every release. [`is_active`](Poolable::is_active)
/// is read when an object comes off the available stack; an object that reports
/// itself active there is skipped and logged.
///
/// # Examples
///
/// ```
/// use recycling_pool::Poolable;
///
/// struct Spark {
///     visible: bool,
/// }
///
/// impl Poolable for Spark {
///     fn set_active(&mut self, active: bool) {
///         self.visible = active;
///     }
///
///     fn is_active(&self) -> bool {
///         self.visible
///     }
/// }
/// ```
pub trait Poolable {
    fn set_active(&mut self, active: bool);

    fn is_active(&self) -> bool;
}
