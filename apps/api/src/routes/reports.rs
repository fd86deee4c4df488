//! Expense history and cost report handlers.

use axum::extract::State;
use axum::Json;

use crate::dto::{CostTotalsResponse, ExpenseDto, ExpensesResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /agroquimicos/gastos/`
pub async fn list_expenses(State(state): State<AppState>) -> ApiResult<Json<ExpensesResponse>> {
    let gastos = state
        .service
        .list_expenses()
        .await?
        .into_iter()
        .map(ExpenseDto::from)
        .collect();

    Ok(Json(ExpensesResponse { gastos }))
}

/// `GET /reportes/costo-total/`
pub async fn total_cost(State(state): State<AppState>) -> ApiResult<Json<CostTotalsResponse>> {
    let totals = state.service.cost_totals().await?;
    Ok(Json(totals.into()))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_report() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/reportes/costo-total/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"costo_total_ars": 0.0, "costo_total_usd": 0.0}));
    }

    #[tokio::test]
    async fn test_report_survives_agrochemical_deletion() {
        let app = test_app().await;

        let (_, created) = send(
            &app,
            Method::POST,
            "/agroquimicos/",
            Some(json!({
                "nombre": "Atrazina", "cantidad": 50, "unidad": "kg",
                "precio_unitario": 4, "moneda": "USD"
            })),
        )
        .await;
        let id = created["agroquimico"]["id"].as_str().unwrap().to_string();

        for _ in 0..2 {
            let (status, _) = send(
                &app,
                Method::POST,
                &format!("/agroquimicos/{id}/aplicar/"),
                Some(json!({"dosis_por_ha": 1, "hectareas": 5})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        send(&app, Method::DELETE, &format!("/agroquimicos/{id}/"), None).await;

        let (_, gastos) = send(&app, Method::GET, "/agroquimicos/gastos/", None).await;
        let gastos = gastos["gastos"].as_array().unwrap().clone();
        assert_eq!(gastos.len(), 2);
        assert_eq!(gastos[0]["agroquimico_id"], id.as_str());

        let (_, report) = send(&app, Method::GET, "/reportes/costo-total", None).await;
        assert_eq!(report["costo_total_usd"], 40.0);
        let ars = report["costo_total_ars"].as_f64().unwrap();
        assert!((ars - 40_000.0).abs() < 1e-6);
    }
}
