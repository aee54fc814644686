use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Extension;
use axum::extract::State;
use axum::response::Html;
use marquee_application::RequestContext;

use crate::state::AppState;

/// Executes a GraphQL request with the resolved request context attached.
pub async fn graphql_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state
        .schema
        .execute(request.into_inner().data(context))
        .await
        .into()
}

pub async fn graphiql_handler() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
