// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Transformation of source template variables into target templating
//! entries.
//!
//! The mapping is pure and 1:1 with no failure modes: every source variable
//! becomes exactly one target variable of kind `custom`, order preserved and
//! names copied verbatim.

use crate::{
    source::SourceVariable,
    target::{CurrentSelection, DatasourceRef, TargetVariable, Templating, VariableOption},
};

/// Kind tag applied to every converted variable.
const CUSTOM_KIND: &str = "custom";

/// Converts the source variable list into the target templating block.
///
/// Order is preserved and no variable is dropped or renamed. The filter
/// prefix becomes the variable query and the default value is copied into
/// both halves of the current selection.
pub fn transform_variables(
    variables: &[SourceVariable],
    datasource: &DatasourceRef,
) -> Templating
{
    let list = variables
        .iter()
        .map(|variable| transform_variable(variable, datasource,),)
        .collect();

    Templating {
        list,
    }
}

fn transform_variable(variable: &SourceVariable, datasource: &DatasourceRef,) -> TargetVariable
{
    let current = variable.default.clone().unwrap_or_default();
    let options = variable
        .available_values
        .iter()
        .map(|value| VariableOption {
            text:  value.clone(),
            value: value.clone(),
        },)
        .collect();

    TargetVariable {
        name: variable.name.clone(),
        kind: CUSTOM_KIND.to_owned(),
        datasource: datasource.clone(),
        query: variable.prefix.clone(),
        current: CurrentSelection {
            text:  current.clone(),
            value: current,
        },
        options,
        skip_url_sync: false,
        hide: 0,
    }
}

#[cfg(test)]
mod tests
{
    use serde_json::json;

    use super::transform_variables;
    use crate::{source::SourceVariable, target::DatasourceRef};

    fn variable(name: &str, prefix: &str, default: Option<&str,>,) -> SourceVariable
    {
        SourceVariable {
            name: name.to_owned(),
            prefix: prefix.to_owned(),
            default: default.map(str::to_owned,),
            available_values: Vec::new(),
        }
    }

    #[test]
    fn maps_variable_fields_one_to_one()
    {
        let datasource = DatasourceRef::named("prometheus",);
        let templating = transform_variables(
            &[variable("k8s_cluster", "kube_cluster", Some("*",),)],
            &datasource,
        );

        assert_eq!(templating.list.len(), 1);
        let mapped = &templating.list[0];
        assert_eq!(mapped.name, "k8s_cluster");
        assert_eq!(mapped.kind, "custom");
        assert_eq!(mapped.query, "kube_cluster");
        assert_eq!(mapped.current.value, "*");
        assert_eq!(mapped.current.text, "*");
        assert!(!mapped.skip_url_sync);
        assert_eq!(mapped.hide, 0);
    }

    #[test]
    fn serialized_variable_matches_wire_format()
    {
        let datasource = DatasourceRef::named("prometheus",);
        let templating = transform_variables(
            &[variable("k8s_cluster", "kube_cluster", Some("*",),)],
            &datasource,
        );

        let value = serde_json::to_value(&templating.list[0],).expect("serialize",);
        assert_eq!(value["name"], json!("k8s_cluster"));
        assert_eq!(value["type"], json!("custom"));
        assert_eq!(value["query"], json!("kube_cluster"));
        assert_eq!(value["current"], json!({"text": "*", "value": "*"}));
        assert_eq!(value["skipUrlSync"], json!(false));
    }

    #[test]
    fn preserves_order_and_names()
    {
        let datasource = DatasourceRef::named("prometheus",);
        let templating = transform_variables(
            &[
                variable("zeta", "z", None,),
                variable("alpha", "a", None,),
            ],
            &datasource,
        );

        let names: Vec<_,> =
            templating.list.iter().map(|entry| entry.name.as_str(),).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn missing_default_maps_to_empty_selection()
    {
        let datasource = DatasourceRef::named("prometheus",);
        let templating =
            transform_variables(&[variable("env", "environment", None,)], &datasource,);

        assert_eq!(templating.list[0].current.value, "");
        assert_eq!(templating.list[0].current.text, "");
    }

    #[test]
    fn values_list_maps_to_options()
    {
        let datasource = DatasourceRef::named("prometheus",);
        let mut seeded = variable("env", "environment", Some("prod",),);
        seeded.available_values = vec!["prod".to_owned(), "staging".to_owned()];

        let templating = transform_variables(&[seeded], &datasource,);
        let options = &templating.list[0].options;
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].text, "prod");
        assert_eq!(options[1].value, "staging");
    }

    #[test]
    fn empty_input_yields_empty_templating()
    {
        let datasource = DatasourceRef::named("prometheus",);
        let templating = transform_variables(&[], &datasource,);
        assert!(templating.list.is_empty());
    }
}
