#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare a [`Rule`](crate::Rule).
///
/// The body may evaluate to anything implementing
/// [`IntoOutcome`](crate::IntoOutcome): an `Outcome`, an `Option<Outcome>`
/// (`None` meaning no opinion), or a `Result<Outcome, PredicateFailure>`.
/// `?` and `return` inside the body leave the body only.
#[macro_export]
macro_rules! rule {
    (@default $default:expr) => { $default };
    (@default $default:expr, $value:expr) => { $value };
    (
        id: $id:expr,
        family: $family:expr
        $(, version: $version:expr)?
        $(, summary: $summary:expr)?
        $(, context: [ $($key:expr),* $(,)? ])?
        , eval: |$token:ident, $context:ident, $progress:ident| -> $ret_ty:ty $body:block
        $(,)?
    ) => {{
        $crate::Rule {
            id: $id,
            family: $family,
            version: $crate::rule!(@default 1 $(, $version)?),
            summary: $crate::rule!(@default "" $(, $summary)?),
            context_keys: &[ $($($key),*)? ],
            evaluate: Box::new(
                move |$token: &$crate::Token, $context: &$crate::Context, $progress: &$crate::Progress| {
                    use $crate::IntoOutcome;
                    let body = || -> $ret_ty { $body };
                    body().into_outcome()
                },
            ),
        }
    }};
}
