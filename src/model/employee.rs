use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "E001",
        "name": "Alice",
        "department": "Ops",
        "phone": "555-1111",
        "email": "a@x.com"
    })
)]
pub struct Employee {
    #[schema(example = "E001")]
    pub employee_id: String,

    #[schema(example = "Alice")]
    pub name: String,

    #[schema(example = "Ops")]
    pub department: String,

    #[schema(example = "555-1111")]
    pub phone: String,

    #[schema(example = "a@x.com")]
    pub email: String,
}
