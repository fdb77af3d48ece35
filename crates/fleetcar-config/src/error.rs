use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定の読み込みに失敗しました: {0}")]
    Load(#[from] config::ConfigError),

    #[error("設定ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error(
        "必須の設定がありません: {key}\n\
        環境変数 {env} で指定するか、FM_LOCAL_SETUP=true でローカル既定値を使ってください"
    )]
    Missing { key: &'static str, env: &'static str },

    #[error("無効な値です: {key} = '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
