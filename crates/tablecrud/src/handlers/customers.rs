use axum::{
    extract::{Query, State},
    response::Redirect,
    Form, Json,
};

use tablecrud_core::customer::CustomerRecord;

use crate::{
    handlers::AppError,
    models::{CreateCustomer, SearchQuery},
    state::AppState,
};

/// List the first page of customers (GET /).
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerRecord>>, AppError> {
    let customers = state.customers.list_all(&state.table).await?;
    Ok(Json(customers))
}

/// List every customer across all pages (GET /customers).
///
/// Aborted with 503 if the server shuts down mid-listing.
pub async fn list_all_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerRecord>>, AppError> {
    let customers = state
        .customers
        .list_all_paginated(&state.table, &state.shutdown_signal())
        .await?;

    tracing::debug!(table = %state.table, rows = customers.len(), "Listed all customers");

    Ok(Json(customers))
}

/// List `first_name,email` pairs (GET /customers/emails).
pub async fn list_customer_emails(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let emails = state.customers.list_customer_emails(&state.table).await?;
    Ok(Json(emails))
}

/// Search customers by partition key fragment (GET /customers/search?name=...).
///
/// Reads every page like GET /customers, so shutdown aborts it with 503 too.
pub async fn search_customers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CustomerRecord>>, AppError> {
    let customers = state
        .customers
        .filter_by_key_prefix(&state.table, query.fragment(), &state.shutdown_signal())
        .await?;
    Ok(Json(customers))
}

/// Add a customer (POST /customers), then redirect to the listing.
pub async fn create_customer(
    State(state): State<AppState>,
    Form(payload): Form<CreateCustomer>,
) -> Result<Redirect, AppError> {
    let customer = payload.into_record();

    state.customers.insert(&state.table, &customer).await?;

    tracing::info!(
        table = %state.table,
        partition_key = %customer.partition_key,
        row_key = %customer.row_key,
        "Created new customer"
    );

    Ok(Redirect::to("/"))
}
