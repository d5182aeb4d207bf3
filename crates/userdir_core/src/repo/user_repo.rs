//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Count, page, filter and look up users over the `users` table.
//! - Insert new users and hand back the storage-assigned identifier.
//!
//! # Invariants
//! - Every call runs in its own transaction, opened on entry and released
//!   on every exit path. Callers must not hold an open transaction on the
//!   same connection.
//! - Sort/filter field names are resolved through `UserField`; raw caller
//!   strings never reach SQL text.
//! - Write paths call `UserDetails::validate()` before SQL mutations.

use crate::model::user::{UserDetails, UserId, UserValidationError};
use crate::query::{effective_filter, FilterParam, QueryParam};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::fields::{like_contains, UserField};
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Rows, Transaction, TransactionBehavior};

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    full_name,
    created_at
FROM users";

const REQUIRED_COLUMNS: [&str; 5] = ["id", "name", "email", "full_name", "created_at"];

/// Paginated, filterable access to persisted users.
pub trait UserRepository {
    /// Total number of users.
    fn count(&self) -> RepoResult<u64>;
    /// Number of users whose `filter.field` contains `filter.value`, ignoring
    /// case. An absent or blank filter counts every user.
    fn count_matching(&self, filter: Option<&FilterParam<String>>) -> RepoResult<u64>;
    fn get_by_id(&self, id: UserId) -> RepoResult<Option<UserDetails>>;
    /// Case-insensitive exact match on the unique name.
    fn get_by_name(&self, name: &str) -> RepoResult<Option<UserDetails>>;
    /// Case-insensitive exact match on the unique email.
    fn get_by_email(&self, email: &str) -> RepoResult<Option<UserDetails>>;
    /// One page of users ordered by `page.property()`.
    fn find(&self, page: &QueryParam) -> RepoResult<Vec<UserDetails>>;
    /// One page of the users matching `filter`. An absent or blank filter
    /// behaves like `find`.
    fn find_matching(
        &self,
        page: &QueryParam,
        filter: Option<&FilterParam<String>>,
    ) -> RepoResult<Vec<UserDetails>>;
    /// Inserts `user`, writes the generated id and creation time back into
    /// it and returns the id.
    fn save(&self, user: &mut UserDetails) -> RepoResult<UserId>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   not migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_user_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn read_tx(&self) -> RepoResult<Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    fn count_where(&self, filter: Option<(UserField, &str)>) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM users");
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some((field, value)) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(&field.contains_predicate());
            bind_values.push(Value::Text(like_contains(value)));
        }

        let tx = self.read_tx()?;
        let total: i64 = tx.query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        tx.commit()?;

        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))
    }

    fn select_page(
        &self,
        page: &QueryParam,
        filter: Option<(UserField, &str)>,
    ) -> RepoResult<Vec<UserDetails>> {
        let sort = UserField::resolve(page.property())?;

        let mut sql = String::from(USER_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some((field, value)) = filter {
            sql.push_str(" WHERE ");
            sql.push_str(&field.contains_predicate());
            bind_values.push(Value::Text(like_contains(value)));
        }
        sql.push(' ');
        sql.push_str(&sort.order_clause(page.is_ascending()));
        sql.push_str(" LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(page.count()));
        bind_values.push(Value::Integer(page.first()));

        let tx = self.read_tx()?;
        let users = {
            let mut stmt = tx.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut users = Vec::new();
            while let Some(user) = next_user(&mut rows)? {
                users.push(user);
            }
            users
        };
        tx.commit()?;
        Ok(users)
    }

    fn get_unique(&self, field: UserField, value: &str) -> RepoResult<Option<UserDetails>> {
        let sql = format!(
            "{USER_SELECT_SQL} WHERE {} LIMIT 2",
            field.equals_ignore_case_predicate()
        );

        let tx = self.read_tx()?;
        let users = {
            let mut stmt = tx.prepare(&sql)?;
            let mut rows = stmt.query([value])?;
            let mut users = Vec::new();
            while let Some(user) = next_user(&mut rows)? {
                users.push(user);
            }
            users
        };
        tx.commit()?;

        debug!(
            "event=user_get module=repo status=ok by={} found={}",
            field.column(),
            users.len()
        );
        if users.len() > 1 {
            return Err(RepoError::NonUniqueResult {
                field: field.column(),
                matches: users.len(),
            });
        }
        Ok(users.into_iter().next())
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn count(&self) -> RepoResult<u64> {
        let total = self.count_where(None)?;
        debug!("event=user_count module=repo status=ok filtered=false total={total}");
        Ok(total)
    }

    fn count_matching(&self, filter: Option<&FilterParam<String>>) -> RepoResult<u64> {
        let Some(filter) = effective_filter(filter) else {
            return self.count();
        };

        let field = UserField::resolve(filter.field())?;
        let total = self.count_where(Some((field, filter.value().as_str())))?;
        debug!(
            "event=user_count module=repo status=ok filtered=true field={} value_len={} total={}",
            field.column(),
            filter.value().chars().count(),
            total
        );
        Ok(total)
    }

    fn get_by_id(&self, id: UserId) -> RepoResult<Option<UserDetails>> {
        let tx = self.read_tx()?;
        let user = {
            let mut stmt = tx.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query([id])?;
            next_user(&mut rows)?
        };
        tx.commit()?;

        debug!(
            "event=user_get module=repo status=ok by=id id={id} found={}",
            user.is_some()
        );
        Ok(user)
    }

    fn get_by_name(&self, name: &str) -> RepoResult<Option<UserDetails>> {
        self.get_unique(UserField::Name, name)
    }

    fn get_by_email(&self, email: &str) -> RepoResult<Option<UserDetails>> {
        self.get_unique(UserField::Email, email)
    }

    fn find(&self, page: &QueryParam) -> RepoResult<Vec<UserDetails>> {
        let users = self.select_page(page, None)?;
        debug!(
            "event=user_find module=repo status=ok first={} count={} sort={} ascending={} rows={}",
            page.first(),
            page.count(),
            page.property(),
            page.is_ascending(),
            users.len()
        );
        Ok(users)
    }

    fn find_matching(
        &self,
        page: &QueryParam,
        filter: Option<&FilterParam<String>>,
    ) -> RepoResult<Vec<UserDetails>> {
        let Some(filter) = effective_filter(filter) else {
            return self.find(page);
        };

        let field = UserField::resolve(filter.field())?;
        let users = self.select_page(page, Some((field, filter.value().as_str())))?;
        debug!(
            "event=user_find module=repo status=ok first={} count={} sort={} ascending={} field={} value_len={} rows={}",
            page.first(),
            page.count(),
            page.property(),
            page.is_ascending(),
            field.column(),
            filter.value().chars().count(),
            users.len()
        );
        Ok(users)
    }

    fn save(&self, user: &mut UserDetails) -> RepoResult<UserId> {
        if let Some(id) = user.id {
            return Err(UserValidationError::AlreadyPersisted(id).into());
        }
        user.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let inserted = tx.query_row(
            "INSERT INTO users (name, email, full_name)
             VALUES (?1, ?2, ?3)
             RETURNING id, created_at;",
            params![
                user.name.as_str(),
                user.email.as_str(),
                user.full_name.as_deref(),
            ],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        );
        let (id, created_at) = match inserted {
            Ok(values) => values,
            Err(err) => {
                let err = RepoError::from(err);
                warn!("event=user_save module=repo status=error error={err}");
                return Err(err);
            }
        };
        tx.commit()?;

        user.id = Some(id);
        user.created_at = Some(created_at);
        info!("event=user_save module=repo status=ok id={id}");
        Ok(id)
    }
}

fn next_user(rows: &mut Rows<'_>) -> RepoResult<Option<UserDetails>> {
    match rows.next()? {
        Some(row) => Ok(Some(parse_user_row(row)?)),
        None => Ok(None),
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<UserDetails> {
    let id: i64 = row.get("id")?;
    let user = UserDetails {
        id: Some(id),
        name: row.get("name")?,
        email: row.get("email")?,
        full_name: row.get("full_name")?,
        created_at: Some(row.get("created_at")?),
    };
    user.validate().map_err(|err| {
        RepoError::InvalidData(format!("users row {id} failed validation: {err}"))
    })?;
    Ok(user)
}

fn ensure_user_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "users")? {
        return Err(RepoError::MissingRequiredTable("users"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "users", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "users",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
