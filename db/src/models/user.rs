use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, PaginatorTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::error::DomainError;

/// Global role carried in the auth claim. Hierarchy: admin > teacher > student.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, DeriveActiveEnum,
    Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_enum")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Prefix used when generating sequential user codes for the role.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            Role::Student => "ST",
            Role::Teacher => "TC",
            Role::Admin => "AD",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_code: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::class_student::Entity")]
    Enrollments,
}

impl Related<super::class_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields supplied for each user in a bulk registration.
#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl Model {
    /// Registers a batch of users, assigning each a role-prefixed sequential
    /// user code (`ST001`, `TC014`, ...).
    ///
    /// The per-role sequence is derived from a count taken inside the same
    /// transaction as the inserts; the unique index on `user_code` backstops
    /// concurrent batches. Fails with `Conflict` when any username or email
    /// already exists (or repeats within the batch) - no partial insert.
    pub async fn register_many(
        db: &DatabaseConnection,
        users: &[NewUser],
    ) -> Result<Vec<Self>, DomainError> {
        if users.is_empty() {
            return Err(DomainError::invalid_input("No users provided"));
        }

        let usernames: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();

        for (i, u) in users.iter().enumerate() {
            let dup = users[..i]
                .iter()
                .any(|p| p.username == u.username || p.email == u.email);
            if dup {
                return Err(DomainError::conflict(format!(
                    "Duplicate user in batch: {}",
                    u.username
                )));
            }
        }

        let existing = Entity::find()
            .filter(
                Condition::any()
                    .add(Column::Username.is_in(usernames))
                    .add(Column::Email.is_in(emails)),
            )
            .all(db)
            .await?;
        if !existing.is_empty() {
            let taken: Vec<String> = existing.into_iter().map(|u| u.username).collect();
            return Err(DomainError::conflict(format!(
                "Some users already exist: {}",
                taken.join(", ")
            )));
        }

        let txn = db.begin().await?;

        let mut counts = std::collections::HashMap::new();
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            let count = Entity::find()
                .filter(Column::Role.eq(role))
                .count(&txn)
                .await?;
            counts.insert(role, count);
        }

        let mut created = Vec::with_capacity(users.len());
        for user in users {
            let next = counts.get_mut(&user.role).expect("all roles seeded");
            *next += 1;
            let user_code = format!("{}{:03}", user.role.code_prefix(), next);

            let row = ActiveModel {
                user_code: Set(user_code),
                username: Set(user.username.clone()),
                email: Set(user.email.clone()),
                role: Set(user.role),
                created_at: Set(Utc::now()),
                updated_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            created.push(row);
        }

        txn.commit().await?;
        Ok(created)
    }

    /// Convenience wrapper used heavily by tests: register a single user.
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        role: Role,
    ) -> Result<Self, DomainError> {
        let mut created = Self::register_many(
            db,
            &[NewUser {
                username: username.to_string(),
                email: email.to_string(),
                role,
            }],
        )
        .await?;
        Ok(created.pop().expect("one user registered"))
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_role(db: &DatabaseConnection, role: Role) -> Result<Vec<Self>, DbErr> {
        Entity::find().filter(Column::Role.eq(role)).all(db).await
    }

    pub async fn get_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find().all(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            role,
        }
    }

    #[tokio::test]
    async fn test_user_codes_are_sequential_per_role() {
        let db = setup_test_db().await;

        let created = Model::register_many(
            &db,
            &[
                new_user("alice", Role::Student),
                new_user("bob", Role::Student),
                new_user("carol", Role::Teacher),
            ],
        )
        .await
        .unwrap();

        let codes: Vec<&str> = created.iter().map(|u| u.user_code.as_str()).collect();
        assert_eq!(codes, ["ST001", "ST002", "TC001"]);

        // a later batch continues the sequence
        let more = Model::register_many(&db, &[new_user("dave", Role::Student)])
            .await
            .unwrap();
        assert_eq!(more[0].user_code, "ST003");
    }

    #[tokio::test]
    async fn test_existing_username_fails_whole_batch() {
        let db = setup_test_db().await;
        Model::create(&db, "alice", "alice@test.com", Role::Student)
            .await
            .unwrap();

        let err = Model::register_many(
            &db,
            &[new_user("bob", Role::Student), new_user("alice", Role::Student)],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // bob was not inserted either
        assert!(Entity::find()
            .filter(Column::Username.eq("bob"))
            .one(&db)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_within_batch_rejected() {
        let db = setup_test_db().await;
        let err = Model::register_many(
            &db,
            &[new_user("alice", Role::Student), new_user("alice", Role::Teacher)],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
