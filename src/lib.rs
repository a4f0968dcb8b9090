//! Aqlclad – a client for composing AQL queries and paging through their results.
//!
//! Queries are built from small immutable values and serialized to query text:
//! * A [`filter::Clause`] is one comparison, `key operator value`.
//! * A [`filter::Junction`] combines clauses and other junctions with AND/OR,
//!   always fully parenthesized.
//! * An [`assign::Assignment`] is a `{key: value, ...}` document patch.
//! * A [`query::Statement`] pairs an action (`FOR`, `INSERT`, `UPDATE`, `REPLACE`,
//!   `COLLECT`, `REMOVE`) with an element and a [`query::Domain`], which may be a
//!   graph traversal over edge collections.
//! * Statements, filters, sorts, `LET` bindings and returns sequence into a
//!   [`query::Query`] with the `/` operator.
//!
//! How literals are quoted is decided by their [`datatype::Tagged`] tag, fixed
//! when the value is built: text is quoted, numbers, booleans and `null` are not,
//! and [`datatype::Tagged::Expr`] marks a bare expression or variable.
//!
//! ## Modules
//! * [`filter`] – Clauses, junctions and `FILTER`.
//! * [`assign`] – Document patches.
//! * [`query`] – Statements, domains and composite queries, plus the [`query::Aql`] trait.
//! * [`cursor`] – The server cursor pagination protocol.
//! * [`connection`] – Request shaping on top of a pluggable [`connection::Transport`].
//! * [`settings`] – Connection settings read through the `config` crate.
//!
//! ## Quick Start
//! ```
//! use aqlclad::assign::assign;
//! use aqlclad::datatype::Tagged;
//! use aqlclad::filter::{clause, filter};
//! use aqlclad::query::{select, update};
//!
//! let q = select("user").in_("users")
//!     / filter(clause("user.logins").gt(50) & clause("user.active").eq(true))
//!     / update("user").with(assign("important", true).assign("since", Tagged::expr("DATE_NOW()"))).in_("users");
//! assert_eq!(
//!     q.to_string(),
//!     "FOR user IN users\n\tFILTER user.logins > 50 AND user.active == true\n\tUPDATE user WITH {important: true, since: DATE_NOW()} IN users"
//! );
//! ```
//!
//! ## Running queries
//! A [`connection::Connection`] needs a [`connection::Transport`] that performs the
//! actual HTTP exchange. [`connection::Connection::aql`] validates the query, opens a
//! server cursor and returns a [`cursor::Cursor`] holding the first batch; further
//! batches are pulled with [`cursor::Cursor::fetch`] while
//! [`cursor::Cursor::has_more`] is true.

pub mod assign;
pub mod connection;
pub mod cursor;
pub mod datatype;
pub mod error;
pub mod filter;
pub mod query;
pub mod settings;

pub use error::{AqlcladError, Result};
