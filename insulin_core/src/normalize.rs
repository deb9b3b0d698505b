//! Input normalization: raw request JSON into a `PatientSnapshot`.
//!
//! The request boundary is deliberately forgiving. Only the most recent
//! glucose reading is load-bearing: its absence or a non-numeric value aborts
//! the request. Every other field is coerced to a safe default on any
//! problem. Glucose and dose values arrive either as individually numbered
//! fields (`GRBS1..GRBS5`, `Insulin1..Insulin4`) or as arrays (`GRBS`,
//! `Insulin`), which take precedence and are zero-padded.

use crate::types::{
    DietOrder, DoseHistory, GlucoseSeries, PatientSnapshot, Route, DOSE_SLOTS, GLUCOSE_SLOTS,
};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Validate and normalize a raw request into a `PatientSnapshot`.
pub fn normalize_request(raw: &Value) -> Result<PatientSnapshot> {
    let obj = raw
        .as_object()
        .ok_or_else(|| Error::MissingField("GRBS1".into()))?;

    let glucose_slots = collect_slots(obj, "GRBS", "GRBS", GLUCOSE_SLOTS);
    let dose_slots = collect_slots(obj, "Insulin", "Insulin", DOSE_SLOTS);

    // GRBS1 is the single mandatory field; validate before applying defaults.
    let most_recent = match &glucose_slots[0] {
        None => return Err(Error::MissingField("GRBS1".into())),
        Some(value) => coerce_number(value).ok_or_else(|| Error::InvalidValue {
            field: "GRBS1".into(),
            value: value.to_string(),
        })?,
    };

    let mut glucose = [0.0; GLUCOSE_SLOTS];
    glucose[0] = most_recent;
    for (slot, value) in glucose.iter_mut().zip(&glucose_slots).skip(1) {
        *slot = value.as_ref().and_then(coerce_number).unwrap_or(0.0);
    }

    let mut doses = [0.0; DOSE_SLOTS];
    for (slot, value) in doses.iter_mut().zip(&dose_slots) {
        *slot = value.as_ref().and_then(coerce_number).unwrap_or(0.0);
    }

    let has_ckd = obj.get("CKD").and_then(Value::as_bool).unwrap_or(false);
    let dual_inotropes = obj
        .get("Dual inotropes")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let route = match obj.get("route").and_then(Value::as_str) {
        Some("iv") => Route::Iv,
        Some("sc") => Route::Sc,
        _ => Route::Sc,
    };

    let diet_order = match obj.get("diet_order").and_then(Value::as_str) {
        Some("NPO") => DietOrder::Npo,
        Some("others") => DietOrder::Other,
        _ => DietOrder::Other,
    };

    Ok(PatientSnapshot {
        glucose: GlucoseSeries(glucose),
        doses: DoseHistory(doses),
        has_ckd,
        dual_inotropes,
        route,
        diet_order,
    })
}

/// Gather the raw per-slot values for a series field.
///
/// An array under `array_key` wins over the numbered fields: present indices
/// map positionally, missing ones pad with 0, excess ones are ignored. A
/// non-array value under `array_key` is ignored entirely.
fn collect_slots(
    obj: &Map<String, Value>,
    array_key: &str,
    field_prefix: &str,
    slots: usize,
) -> Vec<Option<Value>> {
    if let Some(Value::Array(values)) = obj.get(array_key) {
        return (0..slots)
            .map(|i| Some(values.get(i).cloned().unwrap_or(Value::from(0))))
            .collect();
    }

    (1..=slots)
        .map(|i| obj.get(&format!("{}{}", field_prefix, i)).cloned())
        .collect()
}

/// Best-effort numeric coercion: JSON numbers and numeric strings only.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
