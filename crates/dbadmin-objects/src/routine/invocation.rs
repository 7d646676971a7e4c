//! Stored routine invocation builder

use dbadmin_core::{Record, RoutineKind};

use crate::dml::literal;

/// Name bound to a procedure's cursor parameter and fetched afterwards
pub const CURSOR_NAME: &str = "cursor";

/// How a routine has to be invoked to return its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationForm {
    /// `SELECT * FROM f(..)`
    Select,
    /// `CALL p(..)`
    Call,
    /// `CALL p(..)` with a `refcursor` argument, fetched inside one transaction
    CallWithCursor { cursor_parameter: String },
}

impl InvocationForm {
    /// Pick the invocation form for a routine.
    ///
    /// The cursor parameter only matters for procedures. Returns `None` for
    /// [`RoutineKind::Unknown`], which has no invocation form.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbadmin_core::RoutineKind;
    /// use dbadmin_objects::InvocationForm;
    ///
    /// assert_eq!(
    ///     InvocationForm::resolve(RoutineKind::Function, None),
    ///     Some(InvocationForm::Select)
    /// );
    /// assert_eq!(
    ///     InvocationForm::resolve(RoutineKind::Procedure, Some("cur".to_string())),
    ///     Some(InvocationForm::CallWithCursor { cursor_parameter: "cur".to_string() })
    /// );
    /// assert_eq!(InvocationForm::resolve(RoutineKind::Unknown, None), None);
    /// ```
    pub fn resolve(kind: RoutineKind, cursor_parameter: Option<String>) -> Option<Self> {
        match kind {
            RoutineKind::Function => Some(InvocationForm::Select),
            RoutineKind::Procedure => Some(match cursor_parameter {
                Some(cursor_parameter) if !cursor_parameter.is_empty() => {
                    InvocationForm::CallWithCursor { cursor_parameter }
                }
                _ => InvocationForm::Call,
            }),
            RoutineKind::Unknown => None,
        }
    }
}

/// Render the record's pairs as `name => 'value'` arguments
pub fn format_named_arguments(record: &Record) -> String {
    record
        .pairs()
        .map(|(name, value)| format!("{} => {}", name, literal(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the statement (or batch) invoking `record.name` with the record's
/// pairs as named arguments.
///
/// The cursor form produces a four-statement batch; its only described result
/// set is the `FETCH`.
pub fn build_invocation(form: &InvocationForm, record: &Record) -> String {
    let arguments = format_named_arguments(record);

    match form {
        InvocationForm::Select => format!("SELECT * FROM {}({})", record.name, arguments),
        InvocationForm::Call => format!("CALL {}({})", record.name, arguments),
        InvocationForm::CallWithCursor { cursor_parameter } => {
            let mut call_arguments = format!("{} => {}", cursor_parameter, literal(CURSOR_NAME));
            if !arguments.is_empty() {
                call_arguments.push_str(", ");
                call_arguments.push_str(&arguments);
            }

            [
                "BEGIN;".to_string(),
                format!("CALL {}({});", record.name, call_arguments),
                format!("FETCH ALL IN \"{}\";", CURSOR_NAME),
                "COMMIT;".to_string(),
            ]
            .join("\n")
        }
    }
}

/// Resolve the form and build the invocation in one step.
///
/// Returns `None` when the routine kind has no invocation form.
pub fn build_routine_call(
    kind: RoutineKind,
    cursor_parameter: Option<String>,
    record: &Record,
) -> Option<String> {
    InvocationForm::resolve(kind, cursor_parameter).map(|form| build_invocation(&form, record))
}
