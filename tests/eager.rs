//! Eager relation loading: one follow-up query per relation, independent of
//! batch size.

mod common;

use breakwater::config::OrmConfig;
use breakwater::database::Database;
use breakwater::error::OrmError;
use breakwater::model::Model;
use breakwater::query::eager::load_related;
use breakwater::row::Row;
use breakwater::schema::column::{ColumnDefinition, RelationDef, RelationKind};
use breakwater::schema::table::TableDefinition;
use breakwater::value::{DbType, DbValue};

use common::mock_database;

#[derive(Debug, Clone, PartialEq)]
struct Author {
    id: i64,
    name: String,
    books: Vec<Book>,
}

#[derive(Debug, Clone, PartialEq)]
struct Book {
    id: i64,
    author_id: i64,
    title: String,
}

impl Model for Author {
    fn schema() -> TableDefinition {
        TableDefinition::new(
            "authors",
            vec![
                ColumnDefinition::new("id", DbType::Int64).primary_key(),
                ColumnDefinition::new("name", DbType::String).size(100),
                ColumnDefinition::relation(
                    "books",
                    RelationDef {
                        kind: RelationKind::ToMany,
                        child_table: "books".to_string(),
                        parent_key: "id".to_string(),
                        child_key: "author_id".to_string(),
                        auto_load: true,
                    },
                ),
            ],
        )
    }

    fn from_row(row: &Row) -> Result<Self, OrmError> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            books: Vec::new(),
        })
    }

    fn value_of(&self, column: &str) -> DbValue {
        match column {
            "id" => self.id.into(),
            "name" => self.name.clone().into(),
            other => unreachable!("unexpected column '{other}'"),
        }
    }

    fn load_relations(models: &mut [Self], db: &mut Database) -> Result<(), OrmError> {
        let mut grouped = load_related::<Author, Book>(models, "books", db)?;
        for author in models.iter_mut() {
            let key = author.value_of("id").key_string();
            author.books = grouped.remove(&key).unwrap_or_default();
        }
        Ok(())
    }
}

impl Model for Book {
    fn schema() -> TableDefinition {
        TableDefinition::new(
            "books",
            vec![
                ColumnDefinition::new("id", DbType::Int64).primary_key(),
                ColumnDefinition::new("author_id", DbType::Int64).not_null(),
                ColumnDefinition::new("title", DbType::String).size(200),
            ],
        )
    }

    fn from_row(row: &Row) -> Result<Self, OrmError> {
        Ok(Self {
            id: row.try_get("id")?,
            author_id: row.try_get("author_id")?,
            title: row.try_get("title")?,
        })
    }

    fn value_of(&self, column: &str) -> DbValue {
        match column {
            "id" => self.id.into(),
            "author_id" => self.author_id.into(),
            "title" => self.title.clone().into(),
            other => unreachable!("unexpected column '{other}'"),
        }
    }
}

fn author_row(id: i64) -> Row {
    Row::new(
        vec!["id".to_string(), "name".to_string()],
        vec![
            DbValue::Int64(Some(id)),
            DbValue::String(Some(format!("author {id}"))),
        ],
    )
}

fn book_row(id: i64, author_id: i64) -> Row {
    Row::new(
        vec![
            "id".to_string(),
            "author_id".to_string(),
            "title".to_string(),
        ],
        vec![
            DbValue::Int64(Some(id)),
            DbValue::Int64(Some(author_id)),
            DbValue::String(Some(format!("book {id}"))),
        ],
    )
}

#[test]
fn test_batch_loads_in_one_follow_up_query() {
    let (mut db, state) = mock_database(OrmConfig::default());
    {
        let mut state = state.lock().unwrap();
        state
            .canned_results
            .push_back((1..=50).map(author_row).collect());
        // Two books for author 1, one for author 3, none for the rest.
        state.canned_results.push_back(vec![
            book_row(100, 1),
            book_row(101, 1),
            book_row(102, 3),
        ]);
    }

    let authors: Vec<Author> = db.select(None).unwrap();
    assert_eq!(authors.len(), 50);
    assert_eq!(authors[0].books.len(), 2);
    assert_eq!(authors[2].books.len(), 1);
    assert_eq!(authors[2].books[0].title, "book 102");
    assert!(authors[1].books.is_empty());

    let state = state.lock().unwrap();
    // One query for the parents, one for all their books.
    assert_eq!(state.queries.len(), 2);
    let (child_sql, child_params) = &state.queries[1];
    assert!(child_sql.starts_with("SELECT [id], [author_id], [title] FROM [books] WHERE [author_id] IN ("));
    assert_eq!(child_params.len(), 50);
}

#[test]
fn test_empty_parent_batch_issues_no_child_query() {
    let (mut db, state) = mock_database(OrmConfig::default());
    state.lock().unwrap().canned_results.push_back(vec![]);

    let authors: Vec<Author> = db.select(None).unwrap();
    assert!(authors.is_empty());
    assert_eq!(state.lock().unwrap().queries.len(), 1);
}

#[test]
fn test_unknown_relation_field_is_rejected() {
    let (mut db, _state) = mock_database(OrmConfig::default());
    let authors = vec![Author {
        id: 1,
        name: "a".to_string(),
        books: Vec::new(),
    }];
    let err = load_related::<Author, Book>(&authors, "name", &mut db).unwrap_err();
    assert!(matches!(err, OrmError::UnsupportedExpression(_)));
}
