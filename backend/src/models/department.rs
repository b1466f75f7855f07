use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::DepartmentId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
/// An organisational unit complaints can be assigned to.
pub struct Department {
    #[schema(value_type = String)]
    pub id: DepartmentId,
    pub name: String,
}
