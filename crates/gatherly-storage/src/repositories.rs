// Repository layer for database operations

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::*;

/// True when the error wraps a database unique-constraint violation.
/// Lets callers turn a lost insert race into a conflict response instead
/// of a 500.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Profiles (one per user, created on signup)
    // ============================================

    pub async fn create_profile(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT p.user_id, u.username, u.email, p.full_name, p.bio, p.location, p.picture_url, p.updated_at
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_profiles(&self) -> Result<Vec<ProfileRow>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT p.user_id, u.username, u.email, p.full_name, p.bio, p.location, p.picture_url, p.updated_at
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            ORDER BY u.username ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfile,
    ) -> Result<Option<ProfileRow>> {
        let updated = sqlx::query(
            r#"
            UPDATE profiles
            SET
                full_name = COALESCE($2, full_name),
                bio = COALESCE($3, bio),
                location = COALESCE($4, location),
                picture_url = COALESCE($5, picture_url),
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(&input.full_name)
        .bind(&input.bio)
        .bind(&input.location)
        .bind(&input.picture_url)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_profile(user_id).await
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, title, description, organizer_id, location, start_time, end_time, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, organizer_id, location, start_time, end_time, is_public, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.organizer_id)
        .bind(&input.location)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.is_public)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, organizer_id, location, start_time, end_time, is_public, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event_with_meta(&self, id: Uuid) -> Result<Option<EventWithMetaRow>> {
        let row = sqlx::query_as::<_, EventWithMetaRow>(
            r#"
            SELECT e.id, e.title, e.description, e.organizer_id, e.location, e.start_time, e.end_time, e.is_public, e.created_at, e.updated_at,
                   u.username AS organizer_username, p.full_name AS organizer_full_name,
                   (SELECT COUNT(*) FROM rsvps r WHERE r.event_id = e.id AND r.status = 'going') AS rsvp_count,
                   (SELECT ROUND(AVG(rv.rating)::numeric, 1)::float8 FROM reviews rv WHERE rv.event_id = e.id) AS average_rating
            FROM events e
            JOIN users u ON u.id = e.organizer_id
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// List events matching the filter.
    /// Anonymous callers (viewer = None) only see public events; a viewer
    /// additionally sees their own private events.
    pub async fn list_events(&self, filter: &EventFilter) -> Result<Vec<EventWithMetaRow>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT e.id, e.title, e.description, e.organizer_id, e.location, e.start_time, e.end_time, e.is_public, e.created_at, e.updated_at,
                   u.username AS organizer_username, p.full_name AS organizer_full_name,
                   (SELECT COUNT(*) FROM rsvps r WHERE r.event_id = e.id AND r.status = 'going') AS rsvp_count,
                   (SELECT ROUND(AVG(rv.rating)::numeric, 1)::float8 FROM reviews rv WHERE rv.event_id = e.id) AS average_rating
            FROM events e
            JOIN users u ON u.id = e.organizer_id
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE "#,
        );

        match filter.viewer {
            Some(viewer) => {
                qb.push("(e.is_public = TRUE OR e.organizer_id = ");
                qb.push_bind(viewer);
                qb.push(")");
            }
            None => {
                qb.push("e.is_public = TRUE");
            }
        }

        if let Some(location) = &filter.location {
            qb.push(" AND e.location = ");
            qb.push_bind(location.clone());
        }

        if let Some(organizer) = filter.organizer {
            qb.push(" AND e.organizer_id = ");
            qb.push_bind(organizer);
        }

        if let Some(is_public) = filter.is_public {
            qb.push(" AND e.is_public = ");
            qb.push_bind(is_public);
        }

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (e.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR e.description ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR e.location ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        qb.push(" ORDER BY ");
        qb.push(filter.ordering.as_sql());

        let rows = qb
            .build_query_as::<EventWithMetaRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn update_event(&self, id: Uuid, input: UpdateEvent) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                start_time = COALESCE($5, start_time),
                end_time = COALESCE($6, end_time),
                is_public = COALESCE($7, is_public),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, organizer_id, location, start_time, end_time, is_public, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.location)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.is_public)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        // RSVPs and reviews cascade
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // RSVPs
    // ============================================

    pub async fn create_rsvp(&self, input: CreateRsvp) -> Result<RsvpRow> {
        let row = sqlx::query_as::<_, RsvpRow>(
            r#"
            INSERT INTO rsvps (id, event_id, user_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_id, user_id, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.event_id)
        .bind(input.user_id)
        .bind(&input.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_rsvp(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<RsvpRow>> {
        let row = sqlx::query_as::<_, RsvpRow>(
            r#"
            SELECT id, event_id, user_id, status, created_at, updated_at
            FROM rsvps
            WHERE event_id = $1 AND user_id = $2
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_rsvp_status(&self, id: Uuid, status: &str) -> Result<Option<RsvpRow>> {
        let row = sqlx::query_as::<_, RsvpRow>(
            r#"
            UPDATE rsvps
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, event_id, user_id, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_rsvp_with_context(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RsvpWithContextRow>> {
        let row = sqlx::query_as::<_, RsvpWithContextRow>(
            r#"
            SELECT r.id, r.event_id, e.title AS event_title, r.user_id, u.username, p.full_name, r.status, r.created_at, r.updated_at
            FROM rsvps r
            JOIN events e ON e.id = r.event_id
            JOIN users u ON u.id = r.user_id
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE r.event_id = $1 AND r.user_id = $2
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_rsvps_for_user(&self, user_id: Uuid) -> Result<Vec<RsvpWithContextRow>> {
        let rows = sqlx::query_as::<_, RsvpWithContextRow>(
            r#"
            SELECT r.id, r.event_id, e.title AS event_title, r.user_id, u.username, p.full_name, r.status, r.created_at, r.updated_at
            FROM rsvps r
            JOIN events e ON e.id = r.event_id
            JOIN users u ON u.id = r.user_id
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Reviews
    // ============================================

    pub async fn create_review(&self, input: CreateReview) -> Result<ReviewRow> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (id, event_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, event_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.event_id)
        .bind(input.user_id)
        .bind(input.rating)
        .bind(&input.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_review(&self, id: Uuid) -> Result<Option<ReviewRow>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, event_id, user_id, rating, comment, created_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_review_with_user(&self, id: Uuid) -> Result<Option<ReviewWithUserRow>> {
        let row = sqlx::query_as::<_, ReviewWithUserRow>(
            r#"
            SELECT rv.id, rv.event_id, rv.user_id, u.username, p.full_name, rv.rating, rv.comment, rv.created_at
            FROM reviews rv
            JOIN users u ON u.id = rv.user_id
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE rv.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_review_for_event_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ReviewRow>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT id, event_id, user_id, rating, comment, created_at
            FROM reviews
            WHERE event_id = $1 AND user_id = $2
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_reviews(&self, event_id: Option<Uuid>) -> Result<Vec<ReviewWithUserRow>> {
        let rows = if let Some(event_id) = event_id {
            sqlx::query_as::<_, ReviewWithUserRow>(
                r#"
                SELECT rv.id, rv.event_id, rv.user_id, u.username, p.full_name, rv.rating, rv.comment, rv.created_at
                FROM reviews rv
                JOIN users u ON u.id = rv.user_id
                LEFT JOIN profiles p ON p.user_id = u.id
                WHERE rv.event_id = $1
                ORDER BY rv.created_at DESC
                "#,
            )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, ReviewWithUserRow>(
                r#"
                SELECT rv.id, rv.event_id, rv.user_id, u.username, p.full_name, rv.rating, rv.comment, rv.created_at
                FROM reviews rv
                JOIN users u ON u.id = rv.user_id
                LEFT JOIN profiles p ON p.user_id = u.id
                ORDER BY rv.created_at DESC
                "#,
            )
            .fetch_all(&self.pool)
            .await?
        };

        Ok(rows)
    }

    pub async fn update_review(&self, id: Uuid, input: UpdateReview) -> Result<Option<ReviewRow>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            UPDATE reviews
            SET
                rating = COALESCE($2, rating),
                comment = COALESCE($3, comment)
            WHERE id = $1
            RETURNING id, event_id, user_id, rating, comment, created_at
            "#,
        )
        .bind(id)
        .bind(input.rating)
        .bind(&input.comment)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_review(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_detection_ignores_other_errors() {
        assert!(!is_unique_violation(&anyhow::anyhow!("connection reset")));
        assert!(!is_unique_violation(&anyhow::Error::from(
            sqlx::Error::RowNotFound
        )));
    }
}
