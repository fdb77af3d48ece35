use super::{Rental, Vin};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 一覧・追加結果で返す車両の基本情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarBase {
    pub brand: String,
    pub model: String,
    pub production_date: NaiveDate,
    pub vin: Vin,
}

/// 車両データ (静的な仕様 + 動的な状態)
///
/// 識別情報 (`brand`, `model`, `productionDate`, `vin`) は必須。それ以外は車両サービスが
/// 省略しても受け付け、省略されたものは出力にも含めません。
/// `rental` は単一車両の取得時にのみ付与されます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub brand: String,
    pub model: String,
    pub production_date: NaiveDate,
    pub vin: Vin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_specification: Option<TechnicalSpecification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_data: Option<DynamicData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental: Option<Rental>,
}

impl Car {
    /// CarBase への射影
    pub fn base(&self) -> CarBase {
        CarBase {
            brand: self.brand.clone(),
            model: self.model.clone(),
            production_date: self.production_date,
            vin: self.vin.clone(),
        }
    }

    pub fn into_base(self) -> CarBase {
        CarBase {
            brand: self.brand,
            model: self.model,
            production_date: self.production_date,
            vin: self.vin,
        }
    }

    pub fn with_rental(mut self, rental: Option<Rental>) -> Self {
        self.rental = rental;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TechnicalSpecification {
    pub color: String,
    pub consumption: Consumption,
    pub emissions: Emissions,
    pub engine: Engine,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel: Option<Fuel>,
    pub fuel_capacity: String,
    pub number_of_doors: u32,
    pub number_of_seats: u32,
    pub tire: Tire,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<Transmission>,
    pub trunk_volume: u32,
    pub weight: u32,
}

/// 燃費 (l/100km)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consumption {
    pub city: f32,
    pub combined: f32,
    pub overland: f32,
}

/// 排出量 (g/km)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emissions {
    pub city: f32,
    pub combined: f32,
    pub overland: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    pub power: u32,
    #[serde(rename = "type")]
    pub engine_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tire {
    pub manufacturer: String,
    #[serde(rename = "type")]
    pub tire_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fuel {
    Diesel,
    Electric,
    HybridDiesel,
    HybridPetrol,
    Petrol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transmission {
    Automatic,
    Manual,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DynamicData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doors_lock_state: Option<LockState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_state: Option<EngineState>,
    pub fuel_level_percentage: u32,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trunk_lock_state: Option<LockState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockState {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineState {
    On,
    Off,
}

/// WGS84 座標
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub latitude: f32,
    pub longitude: f32,
}
