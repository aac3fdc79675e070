//! Macros for ergonomic transition tables.

/// Build an ordered `Vec<Transition<C>>` from `"from" => "to"` rows.
///
/// A row may carry a guard with `if <closure>`; rows without one always
/// fire. Rows keep their written order, which is the evaluation order.
///
/// # Example
///
/// ```
/// use statesim::transitions;
///
/// struct Lamp {
///     power: bool,
/// }
///
/// let table = transitions![Lamp;
///     "off" => "on" if |l| l.power,
///     "on" => "off" if |l| !l.power,
///     "broken" => "off",
/// ];
///
/// assert_eq!(table.len(), 3);
/// assert!(table[0].can_execute("off", &Lamp { power: true }));
/// assert!(table[2].guard.is_none());
/// ```
#[macro_export]
macro_rules! transitions {
    (
        $ctx:ty;
        $(
            $from:literal => $to:literal $(if $guard:expr)?
        ),* $(,)?
    ) => {
        vec![
            $(
                $crate::machine::Transition::<$ctx>::new($from, $to)
                    $(.when($guard))?
            ),*
        ]
    };
}
