use campaign::{Combination, ParamValue};
use matrix::{parse_config_values, ConfigTemplate};
use proptest::prelude::*;

fn template(keys: &[String]) -> ConfigTemplate {
    let mut text = String::from("FIXED_HEADER 7\n");
    for key in keys {
        text.push_str(key);
        text.push_str(" 0\n");
    }
    text.push_str("FIXED_FOOTER 9.5\n");
    ConfigTemplate::new(text)
}

fn value_strategy() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        (-100_000i64..100_000).prop_map(ParamValue::Int),
        (-1000.0f64..1000.0).prop_map(ParamValue::Float),
    ]
}

proptest! {
    #[test]
    fn prop_rendered_values_parse_back(
        values in prop::collection::vec(value_strategy(), 1..8)
    ) {
        let keys: Vec<String> = (0..values.len()).map(|idx| format!("KEY_{idx}")).collect();
        let mut overrides = Combination::new();
        for (key, value) in keys.iter().zip(&values) {
            overrides.set(key.clone(), *value);
        }

        let rendered = template(&keys).render(&overrides);
        let parsed = parse_config_values(&rendered);
        prop_assert_eq!(parsed.len(), keys.len() + 2);
        prop_assert_eq!(parsed[0].1, 7.0);
        prop_assert_eq!(parsed[parsed.len() - 1].1, 9.5);

        for ((key, value), (parsed_key, parsed_value)) in
            keys.iter().zip(&values).zip(&parsed[1..])
        {
            prop_assert_eq!(key, parsed_key);
            match value {
                ParamValue::Int(int) => prop_assert_eq!(*parsed_value, *int as f64),
                ParamValue::Float(float) => {
                    prop_assert!((parsed_value - float).abs() <= 0.005 + 1e-9);
                }
            }
        }
    }

    #[test]
    fn prop_untouched_template_is_verbatim(
        lines in prop::collection::vec("[A-Z_]{1,12} [0-9]{1,4}", 0..10)
    ) {
        let text = lines.join("\n");
        let rendered = ConfigTemplate::new(text.clone()).render(&Combination::new());
        prop_assert_eq!(rendered, text);
    }
}
