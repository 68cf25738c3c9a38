//! # Form Encoding
//!
//! Stripe's API takes `application/x-www-form-urlencoded` bodies with
//! bracketed keys (`line_items[0][price]`). This module flattens
//! `CheckoutSessionParams` into those key/value pairs.

use checkout_core::{CheckoutSessionParams, DropdownField, LineItemPrice, SessionLineItem};

/// Form parameters for `POST /v1/checkout/sessions`
pub fn session_form(params: &CheckoutSessionParams) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), params.success_url.clone()),
        ("cancel_url".to_string(), params.cancel_url.clone()),
    ];

    for (i, item) in params.line_items.iter().enumerate() {
        push_line_item(&mut form, i, item);
    }

    for (i, country) in params.allowed_countries.iter().enumerate() {
        form.push((
            format!("shipping_address_collection[allowed_countries][{}]", i),
            country.clone(),
        ));
    }

    if let Some(ref rate) = params.shipping_rate {
        form.push(("shipping_options[0][shipping_rate]".to_string(), rate.clone()));
    }

    if params.allow_promotion_codes {
        form.push(("allow_promotion_codes".to_string(), "true".to_string()));
    }

    for (i, field) in params.custom_fields.iter().enumerate() {
        push_dropdown(&mut form, i, field);
    }

    for (key, value) in &params.metadata {
        form.push((format!("metadata[{}]", key), value.clone()));
    }

    form
}

fn push_line_item(form: &mut Vec<(String, String)>, i: usize, item: &SessionLineItem) {
    match &item.price {
        LineItemPrice::Catalog(price_id) => {
            form.push((format!("line_items[{}][price]", i), price_id.clone()));
        }
        LineItemPrice::Inline {
            currency,
            unit_amount,
            product_name,
        } => {
            form.push((
                format!("line_items[{}][price_data][currency]", i),
                currency.as_str().to_string(),
            ));
            form.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                unit_amount.to_string(),
            ));
            form.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                product_name.clone(),
            ));
        }
    }

    form.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));

    if let Some(range) = item.adjustable_quantity {
        form.push((
            format!("line_items[{}][adjustable_quantity][enabled]", i),
            "true".to_string(),
        ));
        form.push((
            format!("line_items[{}][adjustable_quantity][minimum]", i),
            range.minimum.to_string(),
        ));
        form.push((
            format!("line_items[{}][adjustable_quantity][maximum]", i),
            range.maximum.to_string(),
        ));
    }
}

fn push_dropdown(form: &mut Vec<(String, String)>, i: usize, field: &DropdownField) {
    form.push((format!("custom_fields[{}][key]", i), field.key.clone()));
    form.push((format!("custom_fields[{}][type]", i), "dropdown".to_string()));
    form.push((format!("custom_fields[{}][label][type]", i), "custom".to_string()));
    form.push((format!("custom_fields[{}][label][custom]", i), field.label.clone()));
    if field.optional {
        form.push((format!("custom_fields[{}][optional]", i), "true".to_string()));
    }
    for (j, option) in field.options.iter().enumerate() {
        form.push((
            format!("custom_fields[{}][dropdown][options][{}][label]", i, j),
            option.label.clone(),
        ));
        form.push((
            format!("custom_fields[{}][dropdown][options][{}][value]", i, j),
            option.value.clone(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{AdjustableQuantity, Currency};
    use std::collections::BTreeMap;

    fn params() -> CheckoutSessionParams {
        CheckoutSessionParams {
            line_items: vec![
                SessionLineItem {
                    price: LineItemPrice::Catalog("price_123".to_string()),
                    quantity: 2,
                    adjustable_quantity: None,
                },
                SessionLineItem {
                    price: LineItemPrice::Inline {
                        currency: Currency::default(),
                        unit_amount: 35000,
                        product_name: "Tee".to_string(),
                    },
                    quantity: 1,
                    adjustable_quantity: Some(AdjustableQuantity::default()),
                },
            ],
            success_url: "https://shop.example/success.html".to_string(),
            cancel_url: "https://shop.example/".to_string(),
            allowed_countries: vec!["HK".to_string()],
            shipping_rate: None,
            allow_promotion_codes: false,
            custom_fields: Vec::new(),
            metadata: BTreeMap::new(),
            idempotency_key: "key".to_string(),
        }
    }

    fn get<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_line_items() {
        let form = session_form(&params());

        assert_eq!(get(&form, "mode"), Some("payment"));
        assert_eq!(get(&form, "line_items[0][price]"), Some("price_123"));
        assert_eq!(get(&form, "line_items[0][quantity]"), Some("2"));
        assert_eq!(get(&form, "line_items[0][price_data][currency]"), None);
        assert_eq!(get(&form, "line_items[0][adjustable_quantity][enabled]"), None);

        assert_eq!(get(&form, "line_items[1][price_data][currency]"), Some("hkd"));
        assert_eq!(get(&form, "line_items[1][price_data][unit_amount]"), Some("35000"));
        assert_eq!(get(&form, "line_items[1][price_data][product_data][name]"), Some("Tee"));
        assert_eq!(get(&form, "line_items[1][adjustable_quantity][enabled]"), Some("true"));
        assert_eq!(get(&form, "line_items[1][adjustable_quantity][minimum]"), Some("1"));
        assert_eq!(get(&form, "line_items[1][adjustable_quantity][maximum]"), Some("10"));
    }

    #[test]
    fn test_shipping_and_extras() {
        let mut params = params();
        params.shipping_rate = Some("shr_1".to_string());
        params.allow_promotion_codes = true;
        params.custom_fields = vec![DropdownField::size_selector(&["S", "M"], false)];
        params.metadata.insert("cart".to_string(), "[]".to_string());

        let form = session_form(&params);

        assert_eq!(get(&form, "shipping_address_collection[allowed_countries][0]"), Some("HK"));
        assert_eq!(get(&form, "shipping_options[0][shipping_rate]"), Some("shr_1"));
        assert_eq!(get(&form, "allow_promotion_codes"), Some("true"));
        assert_eq!(get(&form, "custom_fields[0][key]"), Some("size"));
        assert_eq!(get(&form, "custom_fields[0][type]"), Some("dropdown"));
        assert_eq!(get(&form, "custom_fields[0][label][custom]"), Some("Size"));
        assert_eq!(get(&form, "custom_fields[0][optional]"), None);
        assert_eq!(get(&form, "custom_fields[0][dropdown][options][1][value]"), Some("m"));
        assert_eq!(get(&form, "metadata[cart]"), Some("[]"));
    }

    #[test]
    fn test_optional_dropdown() {
        let mut params = params();
        params.custom_fields = vec![DropdownField::size_selector(&["S"], true)];

        let form = session_form(&params);

        assert_eq!(get(&form, "custom_fields[0][optional]"), Some("true"));
    }

    #[test]
    fn test_no_shipping_fields_when_unset() {
        let mut params = params();
        params.allowed_countries.clear();

        let form = session_form(&params);

        assert!(form.iter().all(|(k, _)| !k.starts_with("shipping_")));
        assert_eq!(get(&form, "allow_promotion_codes"), None);
    }
}
