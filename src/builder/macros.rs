//! Macros for ergonomic state table construction.

/// Declare a [`States`](crate::core::States) table inline.
///
/// Each entry maps a state name to a block of `event => action` pairs, where
/// the action is anything convertible into an [`Action`](crate::core::Action):
/// a state name, an `Action`, or a [`Hook`](crate::core::Hook).
///
/// # Example
///
/// ```
/// use statewise::{states, Action, Hook};
///
/// let table = states! {
///     "locked" => {
///         "pay" => "unlocked",
///         "push" => Action::Stay,
///     },
///     "unlocked" => {
///         "push" => "locked",
///         "@enter" => Hook::plain(|| println!("welcome")),
///     },
///     "broken" => {},
/// };
///
/// assert_eq!(table.len(), 3);
/// ```
#[macro_export]
macro_rules! states {
    (
        $(
            $state:expr => {
                $( $event:expr => $action:expr ),* $(,)?
            }
        ),* $(,)?
    ) => {
        $crate::core::States::new()
            $(
                .state(
                    $state,
                    $crate::core::Transitions::new()
                        $( .on($event, $action) )*
                )
            )*
    };
}
