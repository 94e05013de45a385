use diesel::prelude::*;
use crate::{
    config::store::{DbPool, StoreError},
    models::lead_models::{Lead, NewLead},
    schema::leads,
};

pub struct LeadRepository {
    pool: DbPool
}

impl LeadRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn create_lead(&self, new_lead: NewLead) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(leads::table)
            .values(&new_lead)
            .execute(&mut conn)?;
        Ok(())
    }

    // Newest first
    pub fn get_all_leads(&self) -> Result<Vec<Lead>, StoreError> {
        let mut conn = self.pool.get()?;
        let leads_list = leads::table
            .order((leads::created_at.desc(), leads::id.desc()))
            .select(Lead::as_select())
            .load::<Lead>(&mut conn)?;
        Ok(leads_list)
    }

    pub fn find_by_reference(&self, reference: &str) -> Result<Option<Lead>, StoreError> {
        let mut conn = self.pool.get()?;
        let lead = leads::table
            .filter(leads::reference.eq(reference))
            .select(Lead::as_select())
            .first::<Lead>(&mut conn)
            .optional()?;
        Ok(lead)
    }

    // Returns false when no lead has that reference
    pub fn update_status(&self, reference: &str, status: &str) -> Result<bool, StoreError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(leads::table.filter(leads::reference.eq(reference)))
            .set(leads::status.eq(status))
            .execute(&mut conn)?;
        Ok(updated > 0)
    }
}
