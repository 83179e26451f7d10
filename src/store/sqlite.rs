use std::path::Path;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, Row, ToSql};
use crate::document::filters::Filters;
use crate::document::parser::{Product, ScoredProduct};
use crate::error::Result;
use crate::store::{ProductStore, StoreQuery};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    brand TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    price REAL NOT NULL,
    rating REAL NOT NULL DEFAULT 0
);

CREATE VIRTUAL TABLE IF NOT EXISTS products_fts USING fts5(
    name,
    brand,
    category,
    description,
    tokenize='unicode61'
);
"#;

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.brand, p.category, p.description, p.price, p.rating";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        log::info!("Opened product store at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // SQLite's own lower() and NOCASE only fold ASCII.
        conn.create_scalar_function(
            "fold_case",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let text: Option<String> = ctx.get(0)?;
                Ok(text.map(|t| t.to_lowercase()))
            },
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn distinct(&self, column: &str) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT {column} FROM products WHERE {column} <> '' ORDER BY {column}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(values)
    }
}

fn product_from_row(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        brand: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        price: row.get(5)?,
        rating: row.get(6)?,
    })
}

/// FTS5 expression matching any keyword, as a prefix so `laptop` also
/// finds `laptops`.
fn match_expression(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("\"{}\"*", k.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" OR ")
}

fn push_filters(filters: &Filters, sql: &mut String, params: &mut Vec<Box<dyn ToSql>>) {
    if let Some(brand) = &filters.brand {
        params.push(Box::new(brand.to_lowercase()));
        sql.push_str(&format!(" AND fold_case(p.brand) = ?{}", params.len()));
    }
    if let Some(category) = &filters.category {
        params.push(Box::new(category.to_lowercase()));
        sql.push_str(&format!(" AND fold_case(p.category) = ?{}", params.len()));
    }
    if let Some(color) = &filters.color {
        params.push(Box::new(color.to_lowercase()));
        let n = params.len();
        sql.push_str(&format!(
            " AND (instr(fold_case(p.name), ?{n}) > 0 OR instr(fold_case(p.description), ?{n}) > 0)"
        ));
    }
    if let Some(min) = filters.min_price {
        params.push(Box::new(min));
        sql.push_str(&format!(" AND p.price >= ?{}", params.len()));
    }
    if let Some(max) = filters.max_price {
        params.push(Box::new(max));
        sql.push_str(&format!(" AND p.price <= ?{}", params.len()));
    }
}

impl ProductStore for SqliteStore {
    fn insert(&mut self, products: &[Product]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut insert_new = tx.prepare(
                "INSERT INTO products (name, brand, category, description, price, rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            let mut insert_with_id = tx.prepare(
                "INSERT OR REPLACE INTO products (id, name, brand, category, description, price, rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            let mut delete_fts = tx.prepare("DELETE FROM products_fts WHERE rowid = ?1")?;
            let mut insert_fts = tx.prepare(
                "INSERT INTO products_fts (rowid, name, brand, category, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for p in products {
                let id = if p.id > 0 {
                    delete_fts.execute(params![p.id])?;
                    insert_with_id.execute(params![
                        p.id, p.name, p.brand, p.category, p.description, p.price, p.rating
                    ])?;
                    p.id
                } else {
                    insert_new.execute(params![
                        p.name, p.brand, p.category, p.description, p.price, p.rating
                    ])?;
                    tx.last_insert_rowid()
                };
                insert_fts.execute(params![id, p.name, p.brand, p.category, p.description])?;
            }
        }
        tx.commit()?;

        log::info!("Stored {} products", products.len());
        Ok(products.len())
    }

    fn clear(&mut self) -> Result<()> {
        self.conn
            .execute_batch("DELETE FROM products_fts; DELETE FROM products;")?;
        log::info!("Cleared product store");
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn all(&self) -> Result<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p ORDER BY p.id");
        let mut stmt = self.conn.prepare(&sql)?;
        let products = stmt
            .query_map([], product_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(products)
    }

    fn brands(&self) -> Result<Vec<String>> {
        self.distinct("brand")
    }

    fn categories(&self) -> Result<Vec<String>> {
        self.distinct("category")
    }

    fn text_search(&self, query: &StoreQuery) -> Result<Vec<ScoredProduct>> {
        if query.keywords.is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }

        let mut sql = format!(
            r#"
            SELECT
                {PRODUCT_COLUMNS},
                -bm25(products_fts, 3.0, 2.0, 2.0, 1.0) AS score
            FROM products_fts
            JOIN products p ON p.id = products_fts.rowid
            WHERE products_fts MATCH ?1
        "#
        );
        let mut params_vec: Vec<Box<dyn ToSql>> = vec![Box::new(match_expression(query.keywords))];
        push_filters(query.filters, &mut sql, &mut params_vec);
        sql.push_str(&format!(" ORDER BY {} LIMIT {}", query.sort.sql(), query.limit));

        let mut stmt = self.conn.prepare(&sql)?;
        let results = stmt
            .query_map(
                rusqlite::params_from_iter(params_vec.iter().map(|p| p.as_ref())),
                |row| {
                    Ok(ScoredProduct {
                        product: product_from_row(row)?,
                        score: row.get(7)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        log::debug!("Text index returned {} products for {:?}", results.len(), query.keywords);
        Ok(results)
    }

    fn candidates(&self, keywords: &[String], filters: &Filters) -> Result<Vec<Product>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();
        let mut any_field = Vec::new();
        for keyword in keywords {
            params_vec.push(Box::new(keyword.to_lowercase()));
            let n = params_vec.len();
            any_field.push(format!(
                "instr(fold_case(p.name), ?{n}) > 0 OR instr(fold_case(p.brand), ?{n}) > 0 \
                 OR instr(fold_case(p.category), ?{n}) > 0 OR instr(fold_case(p.description), ?{n}) > 0"
            ));
        }

        let mut sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE ({})",
            any_field.join(" OR ")
        );
        push_filters(filters, &mut sql, &mut params_vec);
        sql.push_str(" ORDER BY p.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let products = stmt
            .query_map(
                rusqlite::params_from_iter(params_vec.iter().map(|p| p.as_ref())),
                product_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(products)
    }
}
