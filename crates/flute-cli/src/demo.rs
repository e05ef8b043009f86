// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Demo application served by `flute serve`.
//!
//! | URL                        | Action                    |
//! |----------------------------|---------------------------|
//! | `/`                        | `rootAction`              |
//! | `/product/list/{page?}/`   | `productListAction`       |
//! | `/member/{id}/`            | `memberAction`            |
//! | `/member/edit/{id}/`       | `member_memberEditAction` |
//! | `/member/edit/update/{id}/`| `member_memberEditAction` |
//! | `/signin/`                 | `signinAction`            |
//!
//! Views are not templated: [`JsonDumpRenderer`] writes the forwarded path
//! together with the staged display data and error messages as JSON.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use flute::{
    ActionDefinition, ActionExecute, ActionRegistry, ActionRequestProcessor, ActionResponse,
    ActionRuntime, FluteConfig, FluteError, HtmlRenderer, HtmlResponse, InMemoryTransactionStage,
    PathParamKind, PersistenceError, RequestContext, TokenPolicy, TransactionGenre, UrlChain,
    LOGIN_USER_ATTRIBUTE,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

const PAGE_SIZE: usize = 2;

const PRODUCTS: &[&str] = &[
    "Alto flute",
    "Bass flute",
    "Piccolo",
    "Recorder",
    "Shakuhachi",
];

/// A member row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Optimistic-lock version.
    pub version: i64,
}

#[derive(Debug, Deserialize)]
struct MemberEditForm {
    name: String,
    version: i64,
}

/// In-memory member table.
#[derive(Debug)]
pub struct MemberStore {
    members: Mutex<BTreeMap<i64, Member>>,
}

impl MemberStore {
    /// Creates the store with a few sample members.
    pub fn with_samples() -> Self {
        let members = [(1, "Ada"), (2, "Grace"), (3, "Barbara")]
            .into_iter()
            .map(|(id, name)| {
                (
                    id,
                    Member {
                        id,
                        name: name.to_string(),
                        version: 1,
                    },
                )
            })
            .collect();
        Self {
            members: Mutex::new(members),
        }
    }

    /// Selects a member by id.
    pub fn select(&self, id: i64) -> flute::Result<Member> {
        self.lock()?
            .get(&id)
            .cloned()
            .ok_or_else(|| PersistenceError::NoRowFound.into())
    }

    /// Updates the name if the version still matches.
    pub fn update(&self, id: i64, name: &str, version: i64) -> flute::Result<Member> {
        let mut members = self.lock()?;
        let member = members.get_mut(&id).ok_or(PersistenceError::NoRowFound)?;
        if member.version != version {
            return Err(PersistenceError::OptimisticLock.into());
        }
        member.name = name.to_string();
        member.version += 1;
        Ok(member.clone())
    }

    fn lock(&self) -> flute::Result<std::sync::MutexGuard<'_, BTreeMap<i64, Member>>> {
        self.members
            .lock()
            .map_err(|_| PersistenceError::Other("member store poisoned".to_string()).into())
    }
}

/// Renders a forwarded view as a JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonDumpRenderer;

impl HtmlRenderer for JsonDumpRenderer {
    fn render(
        &self,
        path: &str,
        runtime: &ActionRuntime,
        ctx: &mut RequestContext,
    ) -> flute::Result<()> {
        let data: serde_json::Map<String, serde_json::Value> =
            runtime.display_data().iter().cloned().collect();
        let document = json!({
            "view": path,
            "action": runtime.action_name(),
            "data": data,
            "errors": ctx.error_messages().map(|m| m.to_json()),
        });
        let body = serde_json::to_vec_pretty(&document)
            .map_err(|e| FluteError::Render(e.to_string()))?;
        ctx.output.write_body("application/json", body);
        Ok(())
    }
}

/// Registers the demo actions.
pub fn demo_registry(config: &FluteConfig, store: Arc<MemberStore>) -> flute::Result<ActionRegistry> {
    let mut registry = ActionRegistry::new(config.mapping.clone());

    registry.register(
        ActionDefinition::new("rootAction").execute(
            ActionExecute::index(|_| {
                Ok(HtmlResponse::forward("index.html")
                    .render_with("title", json!("flute"))
                    .into())
            })
            .allow_anyone_access(),
        ),
    )?;

    registry.register(
        ActionDefinition::new("productListAction").execute(
            ActionExecute::index(|args| {
                let page = args.optional_path_param::<usize>(0)?.unwrap_or(1).max(1);
                let products: Vec<&str> = PRODUCTS
                    .iter()
                    .skip((page - 1) * PAGE_SIZE)
                    .take(PAGE_SIZE)
                    .copied()
                    .collect();
                Ok(ActionResponse::json(json!({
                    "page": page,
                    "all_record_count": PRODUCTS.len(),
                    "products": products,
                })))
            })
            .optional_path_param(PathParamKind::Integer)
            .tx_genre(TransactionGenre::Suppressed)
            .allow_anyone_access(),
        ),
    )?;

    let detail_store = Arc::clone(&store);
    registry.register(
        ActionDefinition::new("memberAction").execute(
            ActionExecute::index(move |args| {
                let member = detail_store.select(args.path_param(0)?)?;
                Ok(HtmlResponse::forward("member/member_detail.html")
                    .render_with("member", json!(member))
                    .into())
            })
            .path_param(PathParamKind::Integer),
        ),
    )?;

    let edit_store = Arc::clone(&store);
    let update_store = Arc::clone(&store);
    registry.register(
        ActionDefinition::new("member_memberEditAction")
            .execute(
                ActionExecute::index(move |args| {
                    let member = edit_store.select(args.path_param(0)?)?;
                    Ok(HtmlResponse::forward("member/member_edit.html")
                        .render_with("member", json!(member))
                        .into())
                })
                .path_param(PathParamKind::Integer)
                .token(TokenPolicy::Save),
            )
            .execute(
                ActionExecute::named("update", move |args| {
                    let id: i64 = args.path_param(0)?;
                    args.validate(
                        |form, messages| {
                            match form.text("name") {
                                None => messages.add_key("name", "constraints.Required.message"),
                                Some(name) if name.chars().count() > 40 => {
                                    messages.add_key("name", "constraints.Length.message")
                                }
                                Some(_) => {}
                            }
                        },
                        || HtmlResponse::forward("member/member_edit.html").into(),
                    )?;
                    let form: MemberEditForm = args.bind_form()?;
                    let member = update_store.update(id, &form.name, form.version)?;
                    args.redirect_to("memberAction", &UrlChain::new().more_url([id]))?
                        .after_tx_commit(move || {
                            tracing::info!("Member {} renamed to {}", member.id, member.name);
                        })
                })
                .path_param(PathParamKind::Integer)
                .with_form()
                .token(TokenPolicy::Validate),
            ),
    )?;

    registry.register(
        ActionDefinition::new("signinAction").execute(
            ActionExecute::index(|args| {
                let user = args.form()?.text("user").map(str::to_string);
                match user {
                    Some(user) => {
                        args.context_mut()
                            .set_session_attribute(LOGIN_USER_ATTRIBUTE, user);
                        args.redirect_to("rootAction", &UrlChain::new())
                    }
                    None => Ok(ActionResponse::html("signin.html")),
                }
            })
            .with_form()
            .allow_anyone_access(),
        ),
    )?;

    Ok(registry)
}

/// Builds the request processor of the demo application.
pub fn demo_processor(config: &FluteConfig) -> flute::Result<ActionRequestProcessor> {
    let store = Arc::new(MemberStore::with_samples());
    let registry = demo_registry(config, store)?;
    ActionRequestProcessor::builder()
        .registry(Arc::new(registry))
        .config(config.clone())
        .renderer(Arc::new(JsonDumpRenderer))
        .transaction_stage(Arc::new(InMemoryTransactionStage::new()))
        .require_login()
        .build()
}
