//! Optional remote category hint from the transaction-parsing service.
//!
//! The service is a collaborator, not a dependency: any failure is logged
//! and classification carries on without a hint.

use anyhow::{bail, Context, Result};
use cheonma_classify::AiHint;
use cheonma_core::Category;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AiSection;

#[derive(Debug, Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    category: Option<String>,
    confidence: Option<f64>,
}

/// Server label -> taxonomy category. Accepts the service's Korean labels
/// and its upper-case ids, then anything [`Category::from_name`] knows.
pub fn map_server_label(label: &str) -> Option<Category> {
    let label = label.trim();
    let mapped = match label {
        "식비" | "FOOD" | "FOOD_DINING" => Category::Food,
        "교통비" | "TRANSPORT" | "TRANSPORTATION" => Category::Transport,
        "쇼핑" | "SHOPPING" => Category::Shopping,
        "문화생활" | "ENTERTAINMENT" => Category::Entertainment,
        "의료비" | "HEALTHCARE" => Category::Healthcare,
        "교육비" | "EDUCATION" => Category::Education,
        "주거비" | "HOUSING" => Category::Housing,
        "공과금" | "UTILITIES" => Category::Utilities,
        "수입" | "INCOME" => Category::Income,
        "기타" | "OTHER" => Category::Other,
        _ => return Category::from_name(label),
    };
    Some(mapped)
}

pub async fn fetch_hint(ai: &AiSection, text: &str) -> Result<Option<AiHint>> {
    let url = format!("{}/transaction/parse", ai.base_url.trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(ai.timeout_secs))
        .build()
        .context("build http client")?;
    let resp = client
        .post(&url)
        .json(&ParseRequest { text })
        .send()
        .await
        .with_context(|| format!("POST {url}"))?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("ai service error: {status} {txt}");
    }

    let out: ParseResponse = resp.json().await.context("parse ai service response")?;
    let Some(label) = out.category else {
        return Ok(None);
    };
    let Some(category) = map_server_label(&label) else {
        tracing::warn!(label = %label, "ai service returned an unknown category");
        return Ok(None);
    };

    let confidence = out
        .confidence
        .filter(|c| c.is_finite())
        .unwrap_or(ai.hint_confidence);
    Ok(Some(AiHint::new(category.id(), confidence)))
}

/// [`fetch_hint`], with failures downgraded to "no hint".
pub async fn resolve_hint(ai: &AiSection, text: &str) -> Option<AiHint> {
    match fetch_hint(ai, text).await {
        Ok(hint) => {
            tracing::debug!(?hint, "resolved remote ai hint");
            hint
        }
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "remote ai hint unavailable; continuing without it");
            None
        }
    }
}
