//! MDRM dictionary (analyst and above) with a search box.

use axum::extract::{Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use regcollect_common::records::{filter_mdrm_items, MdrmItem};
use regcollect_common::Role;

use crate::session::Session;
use crate::state::SharedState;
use crate::view::Loadable;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
struct MdrmPage<'a> {
    table: Loadable<Vec<MdrmItem>>,
    q: &'a str,
    total: usize,
}

pub async fn mdrm_page(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    let page = MdrmPage { table: Loadable::Loading, q: params.q.trim(), total: 0 };
    Ok(state.views.page("mdrm.html", Some(&session.user), page))
}

/// The full dictionary is fetched and narrowed here, so the search term never
/// reaches the backend.
pub async fn mdrm_table(
    session: Session,
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, Response> {
    session.require(Role::Analyst)?;
    let loaded = Loadable::from_result(session.api().list_mdrm_items().await, "MDRM dictionary");
    let total = match &loaded {
        Loadable::Loaded(items) => items.len(),
        _ => 0,
    };
    let table = loaded.map(|items| filter_mdrm_items(&items, &params.q).into_iter().cloned().collect::<Vec<_>>());
    let page = MdrmPage { table, q: params.q.trim(), total };
    Ok(state.views.page("fragments/mdrm.html", Some(&session.user), page))
}
