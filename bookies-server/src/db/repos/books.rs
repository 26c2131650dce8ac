//! Book repository
//!
//! Handles book CRUD with:
//! - the full author record embedded in every book
//! - author existence left to the `books_author_id_fkey` constraint
//! - writes re-reading the book inside their own transaction

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor, PgPool, Row};

use super::Author;
use crate::db::error::{expect_single_row, DbError};
use crate::models::{BookInput, PageWindow, Paginated, Pagination};

const RESOURCE: &str = "book";

/// Book columns plus the embedded author, prefixed `author_`.
const SELECT_BOOK: &str = r#"
    SELECT
        b.id,
        b.title,
        b.description,
        b.publish_date,
        a.id AS author_id,
        a.name AS author_name,
        a.email AS author_email,
        a.birth_date AS author_birth_date,
        a.bio AS author_bio,
        (SELECT COUNT(c.id) FROM books c WHERE c.author_id = a.id) AS author_book_total
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

/// Book record with its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub pub_date: NaiveDate,
    pub author: Author,
}

impl<'r> FromRow<'r, PgRow> for Book {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            pub_date: row.try_get("publish_date")?,
            author: Author {
                id: row.try_get("author_id")?,
                name: row.try_get("author_name")?,
                email: row.try_get("author_email")?,
                birth_date: row.try_get("author_birth_date")?,
                bio: row.try_get("author_bio")?,
                book_total: row.try_get("author_book_total")?,
            },
        })
    }
}

/// Load one book with its author through any executor (pool or transaction).
async fn select_book<'e, E>(executor: E, id: i64) -> Result<Option<Book>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let query = format!("{SELECT_BOOK} WHERE b.id = $1");
    sqlx::query_as(&query).bind(id).fetch_optional(executor).await
}

/// Book repository
pub struct BookRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BookRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new book.
    ///
    /// The embedded author is read back inside the same transaction, so its
    /// `book_total` already counts the new book.
    pub async fn insert(&self, input: &BookInput) -> Result<Book, DbError> {
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO books (title, description, publish_date, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(input.description.as_deref())
        .bind(input.pub_date)
        .bind(input.author_id)
        .fetch_one(&mut *tx)
        .await?;

        let book = select_book(&mut *tx, id)
            .await?
            .ok_or(DbError::NotFound {
                resource: RESOURCE,
                id,
            })?;

        tx.commit().await?;
        tracing::debug!(book_id = id, author_id = input.author_id, "book inserted");
        Ok(book)
    }

    /// Get a single book by ID with its author.
    pub async fn detail(&self, id: i64) -> Result<Book, DbError> {
        select_book(self.pool, id).await?.ok_or(DbError::NotFound {
            resource: RESOURCE,
            id,
        })
    }

    /// Overwrite every mutable field of an existing book.
    pub async fn update(&self, id: i64, input: &BookInput) -> Result<Book, DbError> {
        self.detail(id).await?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1,
                description = $2,
                publish_date = $3,
                author_id = $4
            WHERE id = $5
            "#,
        )
        .bind(&input.title)
        .bind(input.description.as_deref())
        .bind(input.pub_date)
        .bind(input.author_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        expect_single_row(result.rows_affected(), RESOURCE, id)?;

        let book = select_book(&mut *tx, id)
            .await?
            .ok_or(DbError::NotFound {
                resource: RESOURCE,
                id,
            })?;

        tx.commit().await?;
        Ok(book)
    }

    /// Delete a book, returning the record as it was.
    pub async fn delete(&self, id: i64) -> Result<Book, DbError> {
        let book = self.detail(id).await?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        expect_single_row(result.rows_affected(), RESOURCE, id)?;

        tx.commit().await?;
        tracing::debug!(book_id = id, "book deleted");
        Ok(book)
    }

    /// List books newest first, optionally only those of one author.
    pub async fn fetch(
        &self,
        page: Pagination,
        author_id: Option<i64>,
    ) -> Result<Paginated<Book>, DbError> {
        let (record_total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(id) FROM books WHERE ($1::BIGINT IS NULL OR author_id = $1)",
        )
        .bind(author_id)
        .fetch_one(self.pool)
        .await?;

        let window = PageWindow::new(page, record_total);

        let query = format!(
            "{SELECT_BOOK}
            WHERE ($1::BIGINT IS NULL OR b.author_id = $1)
            ORDER BY b.id DESC
            LIMIT $2 OFFSET $3"
        );
        let books: Vec<Book> = sqlx::query_as(&query)
            .bind(author_id)
            .bind(window.limit)
            .bind(window.offset())
            .fetch_all(self.pool)
            .await?;

        Ok(Paginated::new(window, books))
    }
}
