//! In-memory repositories for tests.
//!
//! Same contract as the Postgres implementations, including ordering and the
//! tri-state merge on update.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{NewPet, NewUser, Pet, PetChanges, PetFilter, User, UserChanges, UserFilter};
use crate::repos::error::RepoResult;
use crate::repos::pet_repo::PetRepository;
use crate::repos::user_repo::UserRepository;

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

// derive(Default) would demand T: Default
impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record as-is, bypassing validation. Lets tests seed states the
    /// use-cases would never produce.
    pub async fn insert_raw(&self, user: User) {
        let mut table = self.table.write().await;
        table.last_id = table.last_id.max(user.id);
        table.rows.insert(user.id, user);
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let mut table = self.table.write().await;
        let id = table.next_id();
        let row = User {
            id,
            name: user.name,
            cpf: user.cpf,
            user_type: user.user_type,
            email: user.email,
            phone: user.phone,
            address: user.address,
            password_hash: user.password_hash,
            role: user.role,
            crmv: user.crmv,
            clinic_address: user.clinic_address,
            professional_id_doc_path: user.professional_id_doc_path,
            diploma_doc_path: user.diploma_doc_path,
            created_at: Utc::now(),
        };
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_cpf(&self, cpf: &str) -> RepoResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.cpf == cpf).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        let table = self.table.read().await;
        let q = filter.q.as_deref().map(str::to_lowercase);

        let mut users: Vec<User> = table
            .rows
            .values()
            .filter(|u| filter.user_type.is_none_or(|t| u.user_type == t))
            .filter(|u| {
                q.as_deref().is_none_or(|q| {
                    u.name.to_lowercase().contains(q) || u.cpf.to_lowercase().contains(q)
                })
            })
            .cloned()
            .collect();

        users.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(users)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> RepoResult<Option<User>> {
        let mut table = self.table.write().await;
        let Some(current) = table.rows.get(&id) else {
            return Ok(None);
        };
        let next = current.merged(&changes);
        table.rows.insert(id, next.clone());
        Ok(Some(next))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPetRepository {
    table: RwLock<Table<Pet>>,
}

impl InMemoryPetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_raw(&self, pet: Pet) {
        let mut table = self.table.write().await;
        table.last_id = table.last_id.max(pet.id);
        table.rows.insert(pet.id, pet);
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl PetRepository for InMemoryPetRepository {
    async fn create(&self, pet: NewPet) -> RepoResult<Pet> {
        let mut table = self.table.write().await;
        let id = table.next_id();
        let row = Pet {
            id,
            owner_id: pet.owner_id,
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            sex: pet.sex,
            age: pet.age,
            weight: pet.weight,
            height: pet.height,
            notes: pet.notes,
            photo_path: pet.photo_path,
            created_at: Utc::now(),
        };
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Pet>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all_by_owner(&self, owner_id: i64, filter: &PetFilter) -> RepoResult<Vec<Pet>> {
        let table = self.table.read().await;
        let name = filter.name.as_deref().map(str::to_lowercase);

        let mut pets: Vec<Pet> = table
            .rows
            .values()
            .filter(|p| p.owner_id == owner_id)
            .filter(|p| {
                name.as_deref()
                    .is_none_or(|n| p.name.to_lowercase().contains(n))
            })
            .filter(|p| filter.species.is_none_or(|s| p.species == s))
            .cloned()
            .collect();

        pets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(pets)
    }

    async fn update(&self, id: i64, changes: PetChanges) -> RepoResult<Option<Pet>> {
        let mut table = self.table.write().await;
        let Some(current) = table.rows.get(&id) else {
            return Ok(None);
        };
        let next = current.merged(&changes);
        table.rows.insert(id, next.clone());
        Ok(Some(next))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
