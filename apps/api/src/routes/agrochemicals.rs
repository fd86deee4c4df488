//! Agrochemical handlers: inventory CRUD and applications.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{
    AgrochemicalCreatedResponse, AgrochemicalDto, AgrochemicalsResponse, AppliedResponse,
    ApplyRequest, CreateAgrochemicalRequest, MessageResponse, AGROCHEMICAL_CREATED,
    AGROCHEMICAL_DELETED,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /agroquimicos/`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateAgrochemicalRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AgrochemicalCreatedResponse>)> {
    let Json(request) = payload?;
    let new_agro = request.into_new_agrochemical()?;
    let agro = state.service.create_agrochemical(new_agro).await?;

    Ok((
        StatusCode::CREATED,
        Json(AgrochemicalCreatedResponse {
            message: AGROCHEMICAL_CREATED.to_string(),
            agroquimico: agro.into(),
        }),
    ))
}

/// `GET /agroquimicos/`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<AgrochemicalsResponse>> {
    let agroquimicos = state
        .service
        .list_agrochemicals()
        .await?
        .into_iter()
        .map(AgrochemicalDto::from)
        .collect();

    Ok(Json(AgrochemicalsResponse { agroquimicos }))
}

/// `DELETE /agroquimicos/{id}/`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.service.delete_agrochemical(&id).await?;
    Ok(Json(MessageResponse::new(AGROCHEMICAL_DELETED)))
}

/// `POST /agroquimicos/{id}/aplicar/`
pub async fn apply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> ApiResult<Json<AppliedResponse>> {
    let Json(request) = payload?;
    let applied = state.service.apply_agrochemical(&id, request.into()).await?;

    Ok(Json(applied.into()))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app};
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};

    async fn create_glifosato(app: &Router, cantidad: f64) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/agroquimicos/",
            Some(json!({
                "nombre": "Glifosato",
                "cantidad": cantidad,
                "unidad": "L",
                "precio_unitario": 50,
                "moneda": "ARS"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Agroquímico agregado");
        body["agroquimico"]["id"].as_str().unwrap().to_string()
    }

    fn stock_of(list: &Value, id: &str) -> f64 {
        list["agroquimicos"]
            .as_array()
            .unwrap()
            .iter()
            .find(|a| a["id"] == id)
            .unwrap()["cantidad"]
            .as_f64()
            .unwrap()
    }

    #[tokio::test]
    async fn test_apply_glifosato() {
        let app = test_app().await;
        let id = create_glifosato(&app, 100.0).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/agroquimicos/{id}/aplicar/"),
            Some(json!({"dosis_por_ha": 2, "hectareas": 10})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Aplicación registrada");
        assert_eq!(body["agroquimico"]["id"], id.as_str());
        assert_eq!(body["agroquimico"]["nombre"], "Glifosato");
        assert_eq!(body["agroquimico"]["stock_restante"], 80.0);
        assert_eq!(body["gasto"]["cantidad_aplicada"], 20.0);
        assert_eq!(body["gasto"]["costo_total_ars"], 1000.0);
        let usd = body["gasto"]["costo_total_usd"].as_f64().unwrap();
        assert!((usd - 1.0).abs() < 1e-9);
        assert_eq!(body["gasto"]["fecha"].as_str().unwrap().len(), 19);

        let (_, list) = send(&app, Method::GET, "/agroquimicos/", None).await;
        assert_eq!(stock_of(&list, &id), 80.0);
    }

    #[tokio::test]
    async fn test_apply_accepts_legacy_dose_field() {
        let app = test_app().await;
        let id = create_glifosato(&app, 100.0).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/agroquimicos/{id}/aplicar"),
            Some(json!({"dosis": 1.5, "hectareas": 4})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["agroquimico"]["stock_restante"], 94.0);
    }

    #[tokio::test]
    async fn test_apply_insufficient_stock() {
        let app = test_app().await;
        let id = create_glifosato(&app, 5.0).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/agroquimicos/{id}/aplicar/"),
            Some(json!({"dosis_por_ha": 2, "hectareas": 10})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Stock insuficiente");
        assert_eq!(body["code"], "INSUFFICIENT_STOCK");

        let (_, list) = send(&app, Method::GET, "/agroquimicos/", None).await;
        assert_eq!(stock_of(&list, &id), 5.0);
        let (_, gastos) = send(&app, Method::GET, "/agroquimicos/gastos/", None).await;
        assert_eq!(gastos, json!({"gastos": []}));
    }

    #[tokio::test]
    async fn test_apply_unknown_and_invalid() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/agroquimicos/missing/aplicar/",
            Some(json!({"dosis_por_ha": 2, "hectareas": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Agroquímico no encontrado");

        let id = create_glifosato(&app, 100.0).await;
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/agroquimicos/{id}/aplicar/"),
            Some(json!({"dosis_por_ha": 0, "hectareas": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_apply_rejects_overflowing_cost() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/agroquimicos/",
            Some(json!({
                "nombre": "Fungicida", "cantidad": 100, "unidad": "L", "precio_unitario": 1e308
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["agroquimico"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/agroquimicos/{id}/aplicar/"),
            Some(json!({"dosis_por_ha": 2, "hectareas": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (_, list) = send(&app, Method::GET, "/agroquimicos/", None).await;
        assert_eq!(stock_of(&list, &id), 100.0);
        let (_, gastos) = send(&app, Method::GET, "/agroquimicos/gastos/", None).await;
        assert_eq!(gastos, json!({"gastos": []}));
        let (_, total) = send(&app, Method::GET, "/reportes/costo-total/", None).await;
        assert_eq!(total["costo_total_ars"], 0.0);
        assert_eq!(total["costo_total_usd"], 0.0);
    }

    #[tokio::test]
    async fn test_create_validation_and_delete() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/agroquimicos/",
            Some(json!({
                "nombre": "Atrazina", "cantidad": -3, "unidad": "kg", "precio_unitario": 4
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            &app,
            Method::POST,
            "/agroquimicos/",
            Some(json!({
                "nombre": "Atrazina", "cantidad": 3, "unidad": "kg",
                "precio_unitario": 4, "moneda": "EUR"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let id = create_glifosato(&app, 10.0).await;
        let (status, body) =
            send(&app, Method::DELETE, &format!("/agroquimicos/{id}/"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Agroquímico eliminado"}));

        let (status, body) =
            send(&app, Method::DELETE, &format!("/agroquimicos/{id}/"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Agroquímico no encontrado");

        let (_, list) = send(&app, Method::GET, "/agroquimicos/", None).await;
        assert_eq!(list, json!({"agroquimicos": []}));
    }
}
