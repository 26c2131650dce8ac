//! Author repository
//!
//! Handles author CRUD with:
//! - book_total computed by LEFT JOIN, never stored
//! - email uniqueness left to the `authors_email_key` constraint

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::db::error::{expect_single_row, DbError};
use crate::models::{AuthorInput, PageWindow, Paginated, Pagination};

const RESOURCE: &str = "author";

const SELECT_DETAIL: &str = r#"
    SELECT
        a.id,
        a.name,
        a.email,
        a.birth_date,
        a.bio,
        COUNT(b.id) AS book_total
    FROM authors a
    LEFT JOIN books b ON b.author_id = a.id
    WHERE a.id = $1
    GROUP BY a.id
"#;

/// Author record, including the derived book count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub bio: Option<String>,
    pub book_total: i64,
}

/// Author repository
pub struct AuthorRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AuthorRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new author.
    ///
    /// A fresh author has no books, so `book_total` is 0 without a join.
    pub async fn insert(&self, input: &AuthorInput) -> Result<Author, DbError> {
        let mut tx = self.pool.begin().await?;

        let author: Author = sqlx::query_as(
            r#"
            INSERT INTO authors (name, email, birth_date, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, birth_date, bio, 0::BIGINT AS book_total
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.birth_date)
        .bind(input.bio.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(author_id = author.id, "author inserted");
        Ok(author)
    }

    /// Get a single author by ID with its book count.
    pub async fn detail(&self, id: i64) -> Result<Author, DbError> {
        sqlx::query_as(SELECT_DETAIL)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(DbError::NotFound {
                resource: RESOURCE,
                id,
            })
    }

    /// Overwrite every mutable field of an existing author.
    pub async fn update(&self, id: i64, input: &AuthorInput) -> Result<Author, DbError> {
        // existence check; a missing row is NotFound before any write
        self.detail(id).await?;

        let mut tx = self.pool.begin().await?;

        let author: Author = sqlx::query_as(
            r#"
            UPDATE authors
            SET name = $1,
                email = $2,
                birth_date = $3,
                bio = $4
            WHERE id = $5
            RETURNING
                id, name, email, birth_date, bio,
                (SELECT COUNT(b.id) FROM books b WHERE b.author_id = authors.id) AS book_total
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(input.birth_date)
        .bind(input.bio.as_deref())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound {
            resource: RESOURCE,
            id,
        })?;

        tx.commit().await?;
        Ok(author)
    }

    /// Delete an author, returning the record as it was.
    ///
    /// Authors that still have books are protected by the books foreign key
    /// and fail with `ForeignKeyViolation`.
    pub async fn delete(&self, id: i64) -> Result<Author, DbError> {
        let author = self.detail(id).await?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // dropping tx on error rolls the delete back
        expect_single_row(result.rows_affected(), RESOURCE, id)?;

        tx.commit().await?;
        tracing::debug!(author_id = id, "author deleted");
        Ok(author)
    }

    /// List authors, newest first.
    pub async fn fetch(&self, page: Pagination) -> Result<Paginated<Author>, DbError> {
        let (record_total,): (i64,) = sqlx::query_as("SELECT COUNT(id) FROM authors")
            .fetch_one(self.pool)
            .await?;

        let window = PageWindow::new(page, record_total);

        let authors: Vec<Author> = sqlx::query_as(
            r#"
            SELECT
                a.id,
                a.name,
                a.email,
                a.birth_date,
                a.bio,
                COUNT(b.id) AS book_total
            FROM authors a
            LEFT JOIN books b ON b.author_id = a.id
            GROUP BY a.id
            ORDER BY a.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(window.limit)
        .bind(window.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(Paginated::new(window, authors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_dates_as_iso() {
        let author = Author {
            id: 1,
            name: "Octavia E. Butler".into(),
            email: "octavia@example.org".into(),
            birth_date: NaiveDate::from_ymd_opt(1947, 6, 22),
            bio: None,
            book_total: 2,
        };

        assert_eq!(
            serde_json::to_value(&author).unwrap(),
            json!({
                "id": 1,
                "name": "Octavia E. Butler",
                "email": "octavia@example.org",
                "birth_date": "1947-06-22",
                "bio": null,
                "book_total": 2
            })
        );
    }
}
