//! GraphQL operations against the Vendure Shop API.
//!
//! Request and response types are generated from the operation documents
//! in `graphql/shop/` against the vendored schema subset there.

use graphql_client::GraphQLQuery;
use rust_decimal::Decimal;

// Custom scalars must be in scope of the derive, named as in the schema.
type Money = Decimal;

/// Catalog listing query.
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetProducts;

/// Add-item mutation for the visitor's active order.
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/shop/schema.graphql",
    query_path = "graphql/shop/add_item_to_order.graphql",
    response_derives = "Debug, Clone"
)]
pub struct AddItemToOrder;
