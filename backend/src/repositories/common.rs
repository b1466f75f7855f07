use sqlx::error::ErrorKind;

/// Integrity constraints the stores translate into domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique,
    ForeignKey,
}

pub fn constraint_violation(err: &sqlx::Error) -> Option<ConstraintViolation> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    match db_err.kind() {
        ErrorKind::UniqueViolation => Some(ConstraintViolation::Unique),
        ErrorKind::ForeignKeyViolation => Some(ConstraintViolation::ForeignKey),
        _ => None,
    }
}
