//! Event database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Event, EventStatus, RegistrationStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub venue: String,
    pub date: DateTimeUtc,
    pub time: String,
    pub registration_deadline: DateTimeUtc,
    pub max_attendees: Option<i32>,
    pub image_url: Option<String>,
    pub status: String,
    pub registration_status: String,
    pub organizer_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OrganizerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Organizer,
    #[sea_orm(has_many = "super::registration::Entity")]
    Registrations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizer.def()
    }
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Event {
    fn from(model: Model) -> Self {
        Event {
            id: model.id,
            title: model.title,
            description: model.description,
            category: model.category,
            venue: model.venue,
            date: model.date,
            time: model.time,
            registration_deadline: model.registration_deadline,
            max_attendees: model.max_attendees,
            image_url: model.image_url,
            status: EventStatus::from(model.status.as_str()),
            registration_status: RegistrationStatus::from(model.registration_status.as_str()),
            organizer_id: model.organizer_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
