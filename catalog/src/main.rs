// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Entry point to the catalog server.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use locallib_catalog::db::init_schema;
use locallib_catalog::serve;
use locallib_core::db::postgres::{PostgresDb, PostgresOptions};
use locallib_core::db::Db;
use locallib_core::env::get_optional_var;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Prefix of the variables that configure the server.
const ENV_PREFIX: &str = "LOCALLIB";

/// Prefix of the variables that configure the connection to the database.
const DB_ENV_PREFIX: &str = "PGSQL_PROD";

#[tokio::main]
async fn main() -> Result<(), String> {
    env_logger::init();

    let port = get_optional_var::<u16>(ENV_PREFIX, "PORT")?.unwrap_or(3000);
    let bind_all = get_optional_var::<bool>(ENV_PREFIX, "BIND_ALL")?.unwrap_or(false);
    let ip = if bind_all { Ipv4Addr::UNSPECIFIED } else { Ipv4Addr::LOCALHOST };

    let db_opts = PostgresOptions::from_env(DB_ENV_PREFIX)?;
    let db = Arc::from(PostgresDb::connect(db_opts).map_err(|e| e.to_string())?);
    let mut ex = db.ex().await.map_err(|e| e.to_string())?;
    init_schema(&mut ex).await.map_err(|e| e.to_string())?;
    drop(ex);

    let result = serve((ip, port), db.clone()).await.map_err(|e| e.to_string());
    db.close().await;
    result
}
