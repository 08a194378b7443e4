//! Finance tracker API endpoints

use api_types::finance::{
    LedgerQuery, LedgerResponse, MonthView, TransactionDelete, TransactionEdit,
    TransactionKind as ApiKind, TransactionNew, TransactionView,
};
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{
    AddTransactionCmd, DeleteTransactionCmd, EditTransactionCmd, LedgerStore, amount_from_json,
    amount_to_json,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn parse_transaction_id(value: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| ServerError::Generic(format!("invalid transaction id: {value}")))
}

fn month_views(periods: Vec<engine::Period>) -> Vec<MonthView> {
    periods
        .into_iter()
        .map(|period| MonthView {
            name: period.name,
            income: amount_to_json(period.income),
            expenses: amount_to_json(period.expenses),
            savings: amount_to_json(period.savings),
            transactions: period
                .transactions
                .into_iter()
                .map(|tx| TransactionView {
                    id: tx.id,
                    kind: map_kind(tx.kind),
                    amount: amount_to_json(tx.amount_minor),
                    date: tx.date,
                })
                .collect(),
        })
        .collect()
}

fn ledger_response(message: &str, periods: Vec<engine::Period>) -> Json<LedgerResponse> {
    Json(LedgerResponse {
        message: Some(message.to_string()),
        updated_financial_data: month_views(periods),
    })
}

/// Every month of the user's finance tracker
pub async fn ledger<S: LedgerStore>(
    State(state): State<ServerState<S>>,
    query: Result<Query<LedgerQuery>, QueryRejection>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let Query(query) = query?;
    let periods = state.engine.ledger(&query.email).await?;

    Ok(Json(LedgerResponse {
        message: None,
        updated_financial_data: month_views(periods),
    }))
}

pub async fn add<S: LedgerStore>(
    State(state): State<ServerState<S>>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<LedgerResponse>), ServerError> {
    let Json(payload) = payload?;
    let cmd = AddTransactionCmd::new(
        payload.email,
        payload.month_name,
        engine_kind(payload.transaction.kind),
        amount_from_json(&payload.transaction.amount)?,
    );
    let periods = state.engine.add_transaction(cmd).await?;

    Ok((
        StatusCode::CREATED,
        ledger_response("Transaction added successfully", periods),
    ))
}

pub async fn edit<S: LedgerStore>(
    State(state): State<ServerState<S>>,
    payload: Result<Json<TransactionEdit>, JsonRejection>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let Json(payload) = payload?;
    let cmd = EditTransactionCmd::new(
        payload.email,
        payload.month_name,
        parse_transaction_id(&payload.transaction_id)?,
        engine_kind(payload.updated_transaction.kind),
        amount_from_json(&payload.updated_transaction.amount)?,
    );
    let periods = state.engine.edit_transaction(cmd).await?;

    Ok(ledger_response("Transaction updated successfully", periods))
}

pub async fn delete<S: LedgerStore>(
    State(state): State<ServerState<S>>,
    payload: Result<Json<TransactionDelete>, JsonRejection>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let Json(payload) = payload?;
    let cmd = DeleteTransactionCmd::new(
        payload.email,
        payload.month_name,
        parse_transaction_id(&payload.transaction_id)?,
    );
    let periods = state.engine.delete_transaction(cmd).await?;

    Ok(ledger_response("Transaction deleted successfully", periods))
}
