use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::locations::models::Location;
use crate::features::locations::validator::{
    validate_fields, FieldViolations, LocationCandidate, MSG_TAKEN,
};

/// Service for reading and writing location records
pub struct LocationService {
    pool: SqlitePool,
}

const LOCATION_COLUMNS: &str = "id, ip_address, country_code, country, city, \
     latitude, longitude, mystery_value, created_at, updated_at";

impl LocationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every stored record in the store's natural order
    pub async fn list(&self) -> Result<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(&format!(
            "SELECT {} FROM locations",
            LOCATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list locations: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(locations)
    }

    /// Get a record by id
    pub async fn get(&self, id: i64) -> Result<Location> {
        let location = sqlx::query_as::<_, Location>(&format!(
            "SELECT {} FROM locations WHERE id = $1",
            LOCATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get location by id: {:?}", e);
            AppError::Database(e)
        })?;

        location.ok_or_else(|| AppError::NotFound(format!("location id {}", id)))
    }

    /// Look up the record matching an IP address. The address is checked for
    /// syntactic validity before the store is queried.
    pub async fn get_by_ip(&self, ip: &str) -> Result<Location> {
        if ip.parse::<std::net::IpAddr>().is_err() {
            return Err(AppError::InvalidIp(ip.to_string()));
        }

        let location = sqlx::query_as::<_, Location>(&format!(
            "SELECT {} FROM locations WHERE ip_address = $1 LIMIT 1",
            LOCATION_COLUMNS
        ))
        .bind(ip)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get location by ip: {:?}", e);
            AppError::Database(e)
        })?;

        location.ok_or_else(|| AppError::NotFound(format!("ip_address {}", ip)))
    }

    /// Run all field rules plus the store-backed uniqueness rule on the
    /// `(country_code, country, city)` triple. Rows with an empty city are
    /// exempt from the uniqueness check.
    pub async fn validate(&self, candidate: &LocationCandidate) -> Result<FieldViolations> {
        let mut violations = validate_fields(candidate);

        if candidate.has_city() {
            let duplicates: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM locations \
                 WHERE country_code IS $1 AND country IS $2 AND city = $3",
            )
            .bind(candidate.country_code.as_deref())
            .bind(candidate.country.as_deref())
            .bind(candidate.city.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check uniqueness: {:?}", e);
                AppError::Database(e)
            })?;

            if duplicates > 0 {
                violations.add("city", MSG_TAKEN);
            }
        }

        Ok(violations)
    }

    /// Validate and persist a single candidate. A record failing any rule is
    /// never persisted.
    pub async fn create(&self, candidate: LocationCandidate) -> Result<Location> {
        let violations = self.validate(&candidate).await?;
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }
        self.insert(candidate).await
    }

    /// Insert without validating. Callers must have validated first; the
    /// importer does so to merge row-parse violations into one report entry.
    pub(crate) async fn insert(&self, candidate: LocationCandidate) -> Result<Location> {
        let now = Utc::now();
        let location = sqlx::query_as::<_, Location>(&format!(
            "INSERT INTO locations \
             (ip_address, country_code, country, city, latitude, longitude, \
              mystery_value, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {}",
            LOCATION_COLUMNS
        ))
        .bind(candidate.ip_address)
        .bind(candidate.country_code)
        .bind(candidate.country)
        .bind(candidate.city)
        .bind(candidate.latitude)
        .bind(candidate.longitude)
        .bind(candidate.mystery_value)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert location: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(location)
    }

    /// Clear the whole table. Irreversible; used by the importer when
    /// `delete_all` is set.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM locations")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete locations: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::memory_pool;

    fn gradymouth() -> LocationCandidate {
        LocationCandidate {
            ip_address: Some("200.106.141.15".to_string()),
            country_code: Some("TL".to_string()),
            country: Some("Saudi Arabia".to_string()),
            city: Some("Gradymouth".to_string()),
            latitude: Some(-49.16675918861615),
            longitude: Some(-86.05920084416894),
            mystery_value: Some(2559997162),
        }
    }

    #[tokio::test]
    async fn test_create_persists_valid_record() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);

        let location = service.create(gradymouth()).await.unwrap();
        assert_eq!(location.ip_address, "200.106.141.15");
        assert_eq!(location.country, "Saudi Arabia");
        assert_eq!(location.mystery_value, Some(2559997162));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_record_without_persisting() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);

        let mut candidate = gradymouth();
        candidate.latitude = Some(91.0);

        match service.create(candidate).await {
            Err(AppError::Validation(violations)) => {
                assert!(violations.get("latitude").is_some());
            }
            other => panic!("expected validation error, got {:?}", other.map(|l| l.id)),
        }
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_triple_rejected_on_city() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);
        service.create(gradymouth()).await.unwrap();

        // different IP, same (country_code, country, city)
        let mut duplicate = gradymouth();
        duplicate.ip_address = Some("31.185.249.104".to_string());

        match service.create(duplicate).await {
            Err(AppError::Validation(violations)) => {
                assert_eq!(
                    violations.get("city"),
                    Some(&vec![MSG_TAKEN.to_string()])
                );
            }
            other => panic!("expected validation error, got {:?}", other.map(|l| l.id)),
        }
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_triple_allowed_when_city_missing() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);

        let mut first = gradymouth();
        first.city = None;
        service.create(first).await.unwrap();

        let mut second = gradymouth();
        second.ip_address = Some("31.185.249.104".to_string());
        second.city = None;
        service.create(second).await.unwrap();

        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_different_city_same_country_allowed() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);
        service.create(gradymouth()).await.unwrap();

        let mut other = gradymouth();
        other.ip_address = Some("160.103.7.140".to_string());
        other.city = Some("Amsterdam".to_string());
        service.create(other).await.unwrap();

        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_get_by_ip_rejects_malformed_address() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);

        match service.get_by_ip("not-an-ip").await {
            Err(AppError::InvalidIp(_)) => {}
            other => panic!("expected InvalidIp, got {:?}", other.map(|l| l.id)),
        }
    }

    #[tokio::test]
    async fn test_get_by_ip_not_found() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);

        match service.get_by_ip("9.9.9.9").await {
            Err(AppError::NotFound(_)) => {}
            other => panic!("expected NotFound, got {:?}", other.map(|l| l.id)),
        }
    }

    #[tokio::test]
    async fn test_get_by_ip_returns_matching_record() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);
        let created = service.create(gradymouth()).await.unwrap();

        let found = service.get_by_ip("200.106.141.15").await.unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.city.as_deref(), Some("Gradymouth"));
    }

    #[tokio::test]
    async fn test_get_by_id_and_list() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);
        let created = service.create(gradymouth()).await.unwrap();

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched.ip_address, created.ip_address);

        assert!(matches!(
            service.get(created.id + 1).await,
            Err(AppError::NotFound(_))
        ));

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_clears_table() {
        let pool = memory_pool().await;
        let service = LocationService::new(pool);
        service.create(gradymouth()).await.unwrap();

        assert_eq!(service.delete_all().await.unwrap(), 1);
        assert_eq!(service.count().await.unwrap(), 0);
    }
}
