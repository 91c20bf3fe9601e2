use crate::shared::errors::{AppError, AppResult};
use log::LevelFilter;
use std::net::{IpAddr, SocketAddr};

/// デフォルトの待ち受けホスト
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);

/// デフォルトの待ち受けポート
pub const DEFAULT_PORT: u16 = 8081;

/// アプリケーションの実行環境
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

impl Environment {
    /// 現在の実行環境を判定する
    ///
    /// 環境変数 ENVIRONMENT が設定されていればそれに従い、
    /// 未設定の場合はビルド設定（debug_assertions）で判定する
    pub fn current() -> Self {
        let env = Self::from_value(std::env::var("ENVIRONMENT").ok().as_deref());
        log::debug!("環境判定: {env:?}");
        env
    }

    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Environment::Production,
            Some(_) => Environment::Development,
            None if cfg!(debug_assertions) => Environment::Development,
            None => Environment::Production,
        }
    }

    /// 環境ごとに読み込む.envファイル名
    pub fn env_file(self) -> &'static str {
        match self {
            Environment::Development => ".env",
            Environment::Production => ".env.production",
        }
    }

    /// LOG_LEVEL 未設定時のログレベル
    pub fn default_log_level(self) -> LevelFilter {
        match self {
            Environment::Development => LevelFilter::Debug,
            Environment::Production => LevelFilter::Info,
        }
    }
}

/// ログ出力に関する環境設定
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: Environment,
    /// ログレベル
    pub log_level: LevelFilter,
}

impl EnvironmentConfig {
    /// 環境変数（ENVIRONMENT, LOG_LEVEL）から設定を読み込む
    pub fn from_env() -> Self {
        let log_level = std::env::var("LOG_LEVEL").ok();
        Self::from_values(Environment::current(), log_level.as_deref())
    }

    /// 設定値から構築する
    ///
    /// # 引数
    /// * `environment` - 実行環境
    /// * `log_level` - ログレベル文字列（未指定の場合は環境ごとのデフォルト、不明な値はInfo）
    pub fn from_values(environment: Environment, log_level: Option<&str>) -> Self {
        let log_level = match log_level {
            Some(value) => value.trim().parse().unwrap_or(LevelFilter::Info),
            None => environment.default_log_level(),
        };

        Self {
            environment,
            log_level,
        }
    }
}

/// HTTPサーバーの待ち受け設定
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// 待ち受けホスト
    pub host: IpAddr,
    /// 待ち受けポート
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// 環境変数からサーバー設定を読み込む
    ///
    /// # 戻り値
    /// サーバー設定、または値が解析できない場合は設定エラー
    ///
    /// # 環境変数
    /// - `SERVER_HOST`: 待ち受けアドレス（デフォルト: 0.0.0.0）
    /// - `SERVER_PORT`: 待ち受けポート（デフォルト: 8081）
    pub fn from_env() -> AppResult<Self> {
        let host = std::env::var("SERVER_HOST").ok();
        let port = std::env::var("SERVER_PORT").ok();
        Self::from_values(host.as_deref(), port.as_deref())
    }

    /// 文字列の設定値からサーバー設定を構築する
    ///
    /// # 引数
    /// * `host` - 待ち受けアドレス（未指定の場合はデフォルト値）
    /// * `port` - 待ち受けポート（未指定の場合はデフォルト値）
    pub fn from_values(host: Option<&str>, port: Option<&str>) -> AppResult<Self> {
        let host = match host {
            Some(value) => value.trim().parse::<IpAddr>().map_err(|e| {
                AppError::configuration(format!("SERVER_HOST が不正です: {value} ({e})"))
            })?,
            None => DEFAULT_HOST,
        };

        let port = match port {
            Some(value) => value.trim().parse::<u16>().map_err(|e| {
                AppError::configuration(format!("SERVER_PORT が不正です: {value} ({e})"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    /// 待ち受けアドレスを取得する
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// 実行環境に応じた.envファイルを読み込む
///
/// ファイルが存在しない場合は直接設定された環境変数のみを使う
///
/// # 戻り値
/// 読み込んだファイル名（見つからなかった場合はNone）
pub fn load_environment_variables() -> Option<&'static str> {
    let env_file = Environment::current().env_file();

    if dotenv::from_filename(env_file).is_ok() {
        return Some(env_file);
    }
    if env_file != ".env" && dotenv::dotenv().is_ok() {
        return Some(".env");
    }
    None
}

/// ログシステムを初期化する
///
/// 二重初期化は無視する（テストから複数回呼ばれる場合がある）
pub fn initialize_logging_system(config: &EnvironmentConfig) {
    let initialized = env_logger::Builder::from_default_env()
        .filter_level(config.log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .is_ok();

    if initialized {
        log::info!(
            "ログシステムを初期化しました: level={}, environment={:?}",
            config.log_level,
            config.environment
        );
    }
}
