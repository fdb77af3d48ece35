//! 境界での入力検証
//!
//! HTTP 層がパスパラメータを受け取った時点で呼び出します。
//! コア層 (store / upstream / ops) は検証済みの値だけを受け取ります。

use regex::Regex;
use std::sync::LazyLock;

// 17 文字。I, O, Q を含まず末尾 4 桁は数字
static VIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-HJ-NPR-Z0-9]{13}[0-9]{4}$").expect("VIN pattern is valid")
});

static FLEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{8}$").expect("fleet id pattern is valid"));

pub fn is_vin_valid(vin: &str) -> bool {
    VIN_RE.is_match(vin)
}

pub fn is_fleet_id_valid(fleet_id: &str) -> bool {
    FLEET_ID_RE.is_match(fleet_id)
}
