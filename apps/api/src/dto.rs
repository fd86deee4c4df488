//! # Wire DTOs
//!
//! Request and response bodies. Field names are the Spanish ones the API
//! has always exposed (`nombre`, `cantidad`, `gastos`, ...); domain types
//! stay in English and are mapped here.

use serde::{Deserialize, Serialize};

use ruralis_core::validation::ValidationResult;
use ruralis_core::{
    Agrochemical, AppliedAgrochemical, ApplicationRequest, CostTotals, Currency, ExpenseRecord,
    NewAgrochemical, NewUser, User,
};

pub const USER_CREATED: &str = "Usuario creado";
pub const USER_DELETED: &str = "Usuario eliminado";
pub const AGROCHEMICAL_CREATED: &str = "Agroquímico agregado";
pub const AGROCHEMICAL_DELETED: &str = "Agroquímico eliminado";
pub const APPLICATION_RECORDED: &str = "Aplicación registrada";

// =============================================================================
// Common
// =============================================================================

/// `{"message": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        NewUser {
            name: req.name,
            email: req.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCreatedResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

// =============================================================================
// Agrochemicals
// =============================================================================

/// `POST /agroquimicos/` body. `moneda` defaults to ARS.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgrochemicalRequest {
    pub nombre: String,
    pub cantidad: f64,
    pub unidad: String,
    pub precio_unitario: f64,
    #[serde(default)]
    pub moneda: Option<String>,
}

impl CreateAgrochemicalRequest {
    /// Maps to the domain input, parsing `moneda` case-insensitively.
    pub fn into_new_agrochemical(self) -> ValidationResult<NewAgrochemical> {
        let currency = match self.moneda.as_deref() {
            Some(code) => code.parse::<Currency>()?,
            None => Currency::default(),
        };

        Ok(NewAgrochemical {
            name: self.nombre,
            quantity: self.cantidad,
            unit: self.unidad,
            unit_price: self.precio_unitario,
            currency,
        })
    }
}

/// Agrochemical as listed and returned on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgrochemicalDto {
    pub id: String,
    pub nombre: String,
    pub cantidad: f64,
    pub unidad: String,
    pub precio_unitario: f64,
    pub moneda: Currency,
}

impl From<Agrochemical> for AgrochemicalDto {
    fn from(a: Agrochemical) -> Self {
        AgrochemicalDto {
            id: a.id,
            nombre: a.name,
            cantidad: a.quantity,
            unidad: a.unit,
            precio_unitario: a.unit_price,
            moneda: a.currency,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgrochemicalCreatedResponse {
    pub message: String,
    pub agroquimico: AgrochemicalDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgrochemicalsResponse {
    pub agroquimicos: Vec<AgrochemicalDto>,
}

// =============================================================================
// Applications
// =============================================================================

/// `POST /agroquimicos/{id}/aplicar/` body. Older clients send `dosis`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ApplyRequest {
    #[serde(alias = "dosis")]
    pub dosis_por_ha: f64,
    pub hectareas: f64,
}

impl From<ApplyRequest> for ApplicationRequest {
    fn from(req: ApplyRequest) -> Self {
        ApplicationRequest::new(req.dosis_por_ha, req.hectareas)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RemainingStockDto {
    pub id: String,
    pub nombre: String,
    pub stock_restante: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedExpenseDto {
    pub id: String,
    pub cantidad_aplicada: f64,
    pub costo_total_ars: f64,
    pub costo_total_usd: f64,
    pub fecha: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedResponse {
    pub message: String,
    pub agroquimico: RemainingStockDto,
    pub gasto: AppliedExpenseDto,
}

impl From<AppliedAgrochemical> for AppliedResponse {
    fn from(applied: AppliedAgrochemical) -> Self {
        let AppliedAgrochemical {
            agrochemical,
            expense,
        } = applied;

        AppliedResponse {
            message: APPLICATION_RECORDED.to_string(),
            agroquimico: RemainingStockDto {
                id: agrochemical.id,
                nombre: agrochemical.name,
                stock_restante: agrochemical.quantity,
            },
            gasto: AppliedExpenseDto {
                id: expense.id,
                cantidad_aplicada: expense.quantity_applied,
                costo_total_ars: expense.cost_in_ars,
                costo_total_usd: expense.cost_in_usd,
                fecha: expense.timestamp,
            },
        }
    }
}

// =============================================================================
// Expenses & Reports
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDto {
    pub id: String,
    pub agroquimico_id: String,
    pub cantidad_aplicada: f64,
    pub costo_total_ars: f64,
    pub costo_total_usd: f64,
    pub fecha: String,
}

impl From<ExpenseRecord> for ExpenseDto {
    fn from(e: ExpenseRecord) -> Self {
        ExpenseDto {
            id: e.id,
            agroquimico_id: e.agrochemical_id,
            cantidad_aplicada: e.quantity_applied,
            costo_total_ars: e.cost_in_ars,
            costo_total_usd: e.cost_in_usd,
            fecha: e.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpensesResponse {
    pub gastos: Vec<ExpenseDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostTotalsResponse {
    pub costo_total_ars: f64,
    pub costo_total_usd: f64,
}

impl From<CostTotals> for CostTotalsResponse {
    fn from(t: CostTotals) -> Self {
        CostTotalsResponse {
            costo_total_ars: t.total_ars,
            costo_total_usd: t.total_usd,
        }
    }
}

// =============================================================================
// Health
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`
    pub status: &'static str,
    pub database: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_request_accepts_both_dose_names() {
        let a: ApplyRequest =
            serde_json::from_value(json!({"dosis_por_ha": 2.0, "hectareas": 10.0})).unwrap();
        let b: ApplyRequest = serde_json::from_value(json!({"dosis": 2, "hectareas": 10})).unwrap();

        assert_eq!(ApplicationRequest::from(a).quantity_needed(), 20.0);
        assert_eq!(ApplicationRequest::from(b).quantity_needed(), 20.0);
    }

    #[test]
    fn test_create_agrochemical_currency() {
        let req: CreateAgrochemicalRequest = serde_json::from_value(json!({
            "nombre": "Atrazina", "cantidad": 10, "unidad": "kg", "precio_unitario": 4.5
        }))
        .unwrap();
        assert_eq!(req.into_new_agrochemical().unwrap().currency, Currency::Ars);

        let req: CreateAgrochemicalRequest = serde_json::from_value(json!({
            "nombre": "Atrazina", "cantidad": 10, "unidad": "kg",
            "precio_unitario": 4.5, "moneda": "usd"
        }))
        .unwrap();
        assert_eq!(req.into_new_agrochemical().unwrap().currency, Currency::Usd);

        let req: CreateAgrochemicalRequest = serde_json::from_value(json!({
            "nombre": "Atrazina", "cantidad": 10, "unidad": "kg",
            "precio_unitario": 4.5, "moneda": "EUR"
        }))
        .unwrap();
        assert!(req.into_new_agrochemical().is_err());
    }

    #[test]
    fn test_agrochemical_wire_shape() {
        let dto = AgrochemicalDto::from(Agrochemical {
            id: "a1".into(),
            name: "Glifosato".into(),
            quantity: 80.0,
            unit: "L".into(),
            unit_price: 50.0,
            currency: Currency::Ars,
        });

        assert_eq!(
            serde_json::to_value(dto).unwrap(),
            json!({
                "id": "a1", "nombre": "Glifosato", "cantidad": 80.0,
                "unidad": "L", "precio_unitario": 50.0, "moneda": "ARS"
            })
        );
    }
}
