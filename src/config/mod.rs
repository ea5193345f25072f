use serde::Deserialize;
use std::env;

// Главная структура конфигурации - контейнер для всех настроек движка
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub coach: CoachConfig,
    pub booking: BookingConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub rust_log: String,
}

// Настройки базы данных
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

// Геометрия вагона: количество мест и размер ряда.
// Последний ряд может быть неполным (80 мест при рядах по 7 -> хвост из 3).
#[derive(Debug, Clone, Deserialize)]
pub struct CoachConfig {
    pub total_seats: i32,
    pub row_size: i32,
}

// Политика бронирования: лимит группы, ретраи и таймауты
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    pub max_party_size: usize,
    pub max_commit_attempts: u32,
    pub store_timeout_ms: u64,
    pub booking_budget_ms: u64,
}

impl Config {
    // Читает конфигурацию из окружения (.env подхватывается, если есть)
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "coach_booking=debug".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
                pool_size: env::var("DB_POOL_SIZE")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .expect("DB_POOL_SIZE must be a valid number"),
            },
            coach: CoachConfig::from_env(),
            booking: BookingConfig::from_env(),
        }
    }
}

impl CoachConfig {
    pub fn from_env() -> Self {
        CoachConfig {
            total_seats: env::var("COACH_TOTAL_SEATS")
                .unwrap_or_else(|_| "80".to_string())
                .parse()
                .expect("COACH_TOTAL_SEATS must be a valid number"),
            row_size: env::var("COACH_ROW_SIZE")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("COACH_ROW_SIZE must be a valid number"),
        }
    }
}

impl BookingConfig {
    pub fn from_env() -> Self {
        BookingConfig {
            max_party_size: env::var("MAX_PARTY_SIZE")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("MAX_PARTY_SIZE must be a valid number"),
            max_commit_attempts: env::var("MAX_COMMIT_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("MAX_COMMIT_ATTEMPTS must be a valid number"),
            store_timeout_ms: env::var("STORE_TIMEOUT_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .expect("STORE_TIMEOUT_MS must be a valid number"),
            booking_budget_ms: env::var("BOOKING_BUDGET_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("BOOKING_BUDGET_MS must be a valid number"),
        }
    }
}

impl Default for CoachConfig {
    fn default() -> Self {
        CoachConfig { total_seats: 80, row_size: 7 }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        BookingConfig {
            max_party_size: 7,
            max_commit_attempts: 3,
            store_timeout_ms: 2000,
            booking_budget_ms: 5000,
        }
    }
}
