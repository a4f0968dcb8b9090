use http::{Request, Response, StatusCode};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use aqlclad::assign::assign;
use aqlclad::connection::{Connection, Shell};
use aqlclad::datatype::Tagged;
use aqlclad::filter::{clause, filter};
use aqlclad::query::{
    collect_all, insert, let_, remove, replace, ret, select, sort, update, upsert, Query,
};
use aqlclad::settings::ConnectionConfig;
use aqlclad::Result;

// Answers every request with an empty batch, so the demo runs without a server.
fn dry_run(request: Request<String>) -> Result<Response<String>> {
    info!(method=%request.method(), uri=%request.uri(), body=%request.body(), "dry run");
    let body = json!({"result": [], "hasMore": false, "error": false, "code": 201}).to_string();
    Ok(Response::builder().status(StatusCode::CREATED).body(body)?)
}

fn samples() -> Vec<Query> {
    let logins = select("login").in_("logins")
        / filter(clause("login.user").eq(Tagged::expr("user._key")))
        / collect_all().with("COUNT").in_("numLogins")
        / ret("numLogins");
    vec![
        select("s").in_("students")
            / filter(clause("s.name").eq(Tagged::expr("s.fathers_name")))
            / sort().asc("s._key")
            / ret("s"),
        insert(json!({"name": "tash", "fathers_name": "tash"})).in_("students").into(),
        select("u").in_(json!({"name": "tash", "fathers_name": "tash"})) / insert("u").in_("students"),
        select("i").in_range(1, 10)
            / insert(
                assign("name", Tagged::expr("CONCAT('test', i)"))
                    .assign("gender", Tagged::expr("(i % 2 == 0 ? 'f' : 'm')"))
                    .assign("fathers_name", "tash"),
            )
            .in_("users"),
        let_("date").bare("DATE_NOW()")
            / select("user").in_("users")
            / filter(clause("user.isImportantUser").eq(()))
            / let_("numberOfLogins").be(logins)
            / filter(clause("numberOfLogins").gt(50))
            / update("user")
                .with(assign("isImportantUser", 1).assign("dateBecameImportant", Tagged::expr("date")))
                .in_("users"),
        replace(json!({"_key": 1234}))
            .with(json!({"name": "tash", "uncles_name": "tash"}))
            .in_("students")
            .into(),
        remove(assign("_key", "1")).in_("students").into(),
        upsert(json!({"name": "tokai"}))
            .insert(json!({"name": "tokai", "fathers_name": "tokai"}))
            .update(json!({"fathers_name": "tokai"}))
            .in_("students")
            .into(),
        select("v").in_("people/42").outbound("friends").depth_range(1, 3) / ret("v"),
    ]
}

fn run() -> Result<()> {
    let config = ConnectionConfig::load("aqlclad")?;
    info!(database=%config.database, authority=%config.authority(), "configuration loaded");
    let mut shell = Shell::new(Connection::new(config, dry_run));
    for query in samples() {
        println!("{}\n", query);
        shell.run(&query)?;
        info!(rows = shell.results().len(), has_more = shell.has_more(), "query complete");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Err(e) = run() {
        error!(%e, "demo failed");
        std::process::exit(1);
    }
}
