/*
 * Responsibility
 * - PetRepository (pets の保存先の契約)
 * - pets テーブル向け SQLx 実装 (PgPetRepository)
 * - owner の所有権チェックはしない (HTTP 層の責務)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::domain::{NewPet, Pet, PetChanges, PetFilter, PetSex, PetSpecies};
use crate::repos::error::{RepoError, RepoResult};

#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn create(&self, pet: NewPet) -> RepoResult<Pet>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Pet>>;
    /// Newest first; ties broken by id, descending.
    async fn find_all_by_owner(&self, owner_id: i64, filter: &PetFilter) -> RepoResult<Vec<Pet>>;
    async fn update(&self, id: i64, changes: PetChanges) -> RepoResult<Option<Pet>>;
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[derive(Debug, FromRow)]
struct PetRow {
    id: i64,
    owner_id: i64,
    name: String,
    species: String,
    breed: Option<String>,
    sex: Option<String>,
    age: Option<i32>,
    weight: Option<f64>,
    height: Option<f64>,
    notes: Option<String>,
    photo_path: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PetRow> for Pet {
    type Error = RepoError;

    fn try_from(row: PetRow) -> Result<Self, Self::Error> {
        let species = row
            .species
            .parse::<PetSpecies>()
            .map_err(|e| RepoError::CorruptRow(format!("pets.species (id {}): {e}", row.id)))?;
        let sex = row
            .sex
            .as_deref()
            .map(str::parse::<PetSex>)
            .transpose()
            .map_err(|e| RepoError::CorruptRow(format!("pets.sex (id {}): {e}", row.id)))?;

        Ok(Pet {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            species,
            breed: row.breed,
            sex,
            age: row.age,
            weight: row.weight,
            height: row.height,
            notes: row.notes,
            photo_path: row.photo_path,
            created_at: row.created_at,
        })
    }
}

const PET_COLUMNS: &str = r#"
    id, owner_id, name, species, breed, sex, age, weight, height, notes, photo_path, created_at
"#;

#[derive(Clone, Debug)]
pub struct PgPetRepository {
    pool: PgPool,
}

impl PgPetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PetRepository for PgPetRepository {
    async fn create(&self, pet: NewPet) -> RepoResult<Pet> {
        let sql = format!(
            r#"
            INSERT INTO pets (owner_id, name, species, breed, sex, age, weight, height, notes, photo_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PET_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PetRow>(&sql)
            .bind(pet.owner_id)
            .bind(&pet.name)
            .bind(pet.species.as_str())
            .bind(pet.breed.as_deref())
            .bind(pet.sex.map(|s| s.as_str()))
            .bind(pet.age)
            .bind(pet.weight)
            .bind(pet.height)
            .bind(pet.notes.as_deref())
            .bind(pet.photo_path.as_deref())
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Pet>> {
        let sql = format!("SELECT {PET_COLUMNS} FROM pets WHERE id = $1");
        let row = sqlx::query_as::<_, PetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Pet::try_from).transpose()
    }

    async fn find_all_by_owner(&self, owner_id: i64, filter: &PetFilter) -> RepoResult<Vec<Pet>> {
        let sql = format!(
            r#"
            SELECT {PET_COLUMNS}
            FROM pets
            WHERE owner_id = $1
              AND ($2::text IS NULL OR name ILIKE $2 ESCAPE '\')
              AND ($3::text IS NULL OR species = $3)
            ORDER BY created_at DESC, id DESC
            "#
        );
        let like = filter.name.as_deref().map(super::contains_pattern);
        let rows = sqlx::query_as::<_, PetRow>(&sql)
            .bind(owner_id)
            .bind(like)
            .bind(filter.species.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Pet::try_from).collect()
    }

    async fn update(&self, id: i64, changes: PetChanges) -> RepoResult<Option<Pet>> {
        let sql = format!(
            r#"
            UPDATE pets
            SET
                name = COALESCE($2, name),
                species = COALESCE($3, species),
                breed = CASE WHEN $4::boolean THEN $5::text ELSE breed END,
                sex = CASE WHEN $6::boolean THEN $7::text ELSE sex END,
                age = CASE WHEN $8::boolean THEN $9::integer ELSE age END,
                weight = CASE WHEN $10::boolean THEN $11::double precision ELSE weight END,
                height = CASE WHEN $12::boolean THEN $13::double precision ELSE height END,
                notes = CASE WHEN $14::boolean THEN $15::text ELSE notes END,
                photo_path = CASE WHEN $16::boolean THEN $17::text ELSE photo_path END
            WHERE id = $1
            RETURNING {PET_COLUMNS}
            "#
        );
        let breed = changes.breed.into_option();
        let sex = changes.sex.map(|s| s.as_str()).into_option();
        let age = changes.age.into_option();
        let weight = changes.weight.into_option();
        let height = changes.height.into_option();
        let notes = changes.notes.into_option();
        let photo_path = changes.photo_path.into_option();

        let row = sqlx::query_as::<_, PetRow>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.species.map(|s| s.as_str()))
            .bind(breed.is_some())
            .bind(breed.flatten())
            .bind(sex.is_some())
            .bind(sex.flatten())
            .bind(age.is_some())
            .bind(age.flatten())
            .bind(weight.is_some())
            .bind(weight.flatten())
            .bind(height.is_some())
            .bind(height.flatten())
            .bind(notes.is_some())
            .bind(notes.flatten())
            .bind(photo_path.is_some())
            .bind(photo_path.flatten())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Pet::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM pets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
