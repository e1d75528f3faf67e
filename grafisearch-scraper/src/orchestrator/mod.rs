//! Aggregator: concurrent provider queries and cross-provider merge.
//!
//! [`aggregate`] fans a query out to every configured provider, and
//! [`dedup`] folds the returned batches into one list keyed by
//! [`url_normalize::normalize_url`].

pub mod aggregate;
pub mod dedup;
pub mod url_normalize;
