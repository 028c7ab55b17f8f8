use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subject")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub pdf_url: Option<String>,
    pub team_info: String,
    pub main_supervisor_name: String,
    pub main_supervisor_email: String,
    pub co_supervisors_names: String,
    pub co_supervisors_emails: String,
    pub status: i16,
    pub admin_comment: Option<String>,
    pub supervisor_id: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::SupervisorId",
        to = "super::profile::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
