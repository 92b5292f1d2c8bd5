// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Translation of source query expressions into the target query language.
//!
//! The source language spells aggregation as `agg:metric{tags} by {group}`;
//! the target spells it as `agg(metric{tags}) by (group)`. The translator
//! rewrites the common case and passes everything else through unchanged,
//! flagging the expression for manual review instead of failing. Function
//! renaming is limited to a fixed table of known equivalents.

use regex::Regex;
use tracing::debug;

use crate::{
    source::SourceQuery,
    target::{DatasourceRef, TargetTarget},
};

/// Known function-name equivalents between the two query languages.
/// Anything absent from this table passes through unchanged.
const FUNCTION_EQUIVALENTS: [(&str, &str,); 4] = [
    ("per_second", "rate",),
    ("derivative", "deriv",),
    ("diff", "delta",),
    ("moving_average", "avg_over_time",),
];

/// Result of translating a single source query.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct TranslatedTarget
{
    /// Target entry carrying the rewritten expression.
    pub target: TargetTarget,

    /// Whether the expression was confidently rewritten. `false` means the
    /// original string was emitted unchanged and needs manual review.
    pub converted: bool,
}

/// Rewrites source query expressions into the target query language.
///
/// The translator compiles its function-equivalent table once and can be
/// reused across widgets and dashboards. Translation never fails; see
/// [`TranslatedTarget::converted`] for the fallback signal.
#[derive(Debug,)]
pub struct QueryTranslator
{
    functions: Vec<(Regex, &'static str,),>,
}

impl QueryTranslator
{
    /// Compiles the function-equivalent table.
    pub fn new() -> Self
    {
        let functions = FUNCTION_EQUIVALENTS
            .iter()
            .map(|(source, target,)| {
                let pattern = Regex::new(&format!(r"\b{source}\s*\("),)
                    .expect("valid function pattern",);
                (pattern, *target,)
            },)
            .collect();

        Self {
            functions,
        }
    }

    /// Translates one source query into a target entry.
    ///
    /// The reference id is assigned by the caller in request order. The
    /// configured datasource is attached to the emitted target.
    pub fn translate(
        &self,
        query: &SourceQuery,
        datasource: &DatasourceRef,
        ref_id: String,
    ) -> TranslatedTarget
    {
        let raw = query.expression().unwrap_or("",);
        let (expr, converted,) = self.rewrite(raw,);

        if !converted {
            debug!("query passed through unchanged: {raw}");
            if let Some(aggregator,) = query.aggregator.as_deref() {
                debug!("aggregator hint '{aggregator}' left unapplied");
            }
        }

        TranslatedTarget {
            target: TargetTarget {
                datasource: datasource.clone(),
                expr,
                ref_id,
                instant: false,
                legend_format: String::new(),
            },
            converted,
        }
    }

    /// Rewrites a raw expression, returning the result and whether the
    /// rewrite was confident.
    fn rewrite(&self, raw: &str,) -> (String, bool,)
    {
        let trimmed = raw.trim();
        let Some((aggregator, remainder,),) = split_aggregator(trimmed,) else {
            return (trimmed.to_owned(), false,);
        };

        let (head, group,) = split_group_clause(remainder,);
        let mut rewritten = match group {
            Some(tags,) => format!("{aggregator}({head}) by ({tags})"),
            None => format!("{aggregator}({head})"),
        };

        for (pattern, replacement,) in &self.functions {
            rewritten = pattern
                .replace_all(&rewritten, format!("{replacement}("),)
                .into_owned();
        }

        (rewritten, true,)
    }
}

impl Default for QueryTranslator
{
    fn default() -> Self
    {
        Self::new()
    }
}

/// Splits `agg:remainder` at the first colon.
///
/// The colon must precede any brace so a tag filter like `{env:prod}` is
/// never mistaken for an aggregator, and the aggregator must be a bare
/// identifier. Returns `None` when no aggregator prefix is recognized.
fn split_aggregator(expr: &str,) -> Option<(&str, &str,),>
{
    let colon = expr.find(':',)?;
    if let Some(brace,) = expr.find('{',)
        && brace < colon
    {
        return None;
    }

    let aggregator = &expr[..colon];
    let remainder = &expr[colon + 1..];
    if aggregator.is_empty() || remainder.is_empty() {
        return None;
    }
    if !aggregator.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_',) {
        return None;
    }

    Some((aggregator, remainder,),)
}

/// Splits a trailing ` by {tags}` clause off the remainder, if present.
fn split_group_clause(remainder: &str,) -> (&str, Option<&str,>,)
{
    let trimmed = remainder.trim();
    if trimmed.ends_with('}',)
        && let Some(index,) = trimmed.rfind(" by {",)
    {
        let head = trimmed[..index].trim_end();
        let tags = &trimmed[index + 5..trimmed.len() - 1];
        return (head, Some(tags,),);
    }

    (trimmed, None,)
}

#[cfg(test)]
mod tests
{
    use super::{QueryTranslator, split_aggregator, split_group_clause};
    use crate::{source::SourceQuery, target::DatasourceRef};

    fn query(raw: &str,) -> SourceQuery
    {
        SourceQuery {
            q: Some(raw.to_owned(),),
            ..SourceQuery::default()
        }
    }

    fn translate(raw: &str,) -> (String, bool,)
    {
        let translator = QueryTranslator::new();
        let datasource = DatasourceRef::named("prometheus",);
        let translated = translator.translate(&query(raw,), &datasource, "A0".to_owned(),);
        (translated.target.expr, translated.converted,)
    }

    #[test]
    fn rewrites_aggregated_query_with_group_clause()
    {
        let (expr, converted,) = translate(
            "sum:kubernetes.cpu.usage.total{kube_cluster:$k8s_cluster} by {kube_cluster}",
        );
        assert!(converted);
        assert_eq!(
            expr,
            "sum(kubernetes.cpu.usage.total{kube_cluster:$k8s_cluster}) by (kube_cluster)"
        );
    }

    #[test]
    fn rewrites_aggregated_query_without_group_clause()
    {
        let (expr, converted,) = translate("avg:system.cpu.user{host:web-1}",);
        assert!(converted);
        assert_eq!(expr, "avg(system.cpu.user{host:web-1})");
    }

    #[test]
    fn preserves_tag_filters_verbatim()
    {
        let (expr, _,) = translate("max:app.latency{env:prod,service:api}",);
        assert_eq!(expr, "max(app.latency{env:prod,service:api})");
    }

    #[test]
    fn passes_through_expression_without_aggregator()
    {
        let (expr, converted,) = translate("kubernetes.cpu.usage.total",);
        assert!(!converted);
        assert_eq!(expr, "kubernetes.cpu.usage.total");
    }

    #[test]
    fn tag_colon_is_not_mistaken_for_aggregator()
    {
        let (expr, converted,) = translate("metric{env:prod}",);
        assert!(!converted);
        assert_eq!(expr, "metric{env:prod}");
    }

    #[test]
    fn function_prefix_is_not_mistaken_for_aggregator()
    {
        let (expr, converted,) = translate("per_second(sum:metric{*})",);
        assert!(!converted);
        assert_eq!(expr, "per_second(sum:metric{*})");
    }

    #[test]
    fn renames_known_functions_in_rewritten_queries()
    {
        let (expr, converted,) = translate("sum:per_second(http.requests){host:web}",);
        assert!(converted);
        assert_eq!(expr, "sum(rate(http.requests){host:web})");
    }

    #[test]
    fn leaves_unknown_functions_untouched()
    {
        let (expr, converted,) = translate("sum:ewma_5(http.requests){*}",);
        assert!(converted);
        assert_eq!(expr, "sum(ewma_5(http.requests){*})");
    }

    #[test]
    fn grouped_query_keeps_multiple_group_tags()
    {
        let (expr, _,) = translate("avg:system.load.1{*} by {host,env}",);
        assert_eq!(expr, "avg(system.load.1{*}) by (host,env)");
    }

    #[test]
    fn blank_expression_passes_through_unconverted()
    {
        let translator = QueryTranslator::new();
        let datasource = DatasourceRef::named("prometheus",);
        let translated = translator.translate(
            &SourceQuery::default(),
            &datasource,
            "A0".to_owned(),
        );
        assert!(!translated.converted);
        assert_eq!(translated.target.expr, "");
    }

    #[test]
    fn translated_target_carries_datasource_and_ref_id()
    {
        let translator = QueryTranslator::new();
        let datasource = DatasourceRef::named("prometheus",);
        let translated =
            translator.translate(&query("sum:a.b{*}",), &datasource, "A3".to_owned(),);
        assert_eq!(translated.target.ref_id, "A3");
        assert_eq!(translated.target.datasource.uid, "prometheus");
        assert!(!translated.target.instant);
    }

    #[test]
    fn split_aggregator_rejects_non_identifier_prefixes()
    {
        assert!(split_aggregator("a b:metric").is_none());
        assert!(split_aggregator(":metric").is_none());
        assert!(split_aggregator("sum:").is_none());
        assert_eq!(split_aggregator("sum:metric"), Some(("sum", "metric")));
    }

    #[test]
    fn split_group_clause_extracts_trailing_tags()
    {
        assert_eq!(
            split_group_clause("metric{a:b} by {c}"),
            ("metric{a:b}", Some("c"))
        );
        assert_eq!(split_group_clause("metric{a:b}"), ("metric{a:b}", None));
        assert_eq!(split_group_clause("metric"), ("metric", None));
    }
}
