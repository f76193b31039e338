use crate::model::{booking::Requester, id::UserId, role::Role};
pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn requester(&self) -> Requester {
        Requester {
            user_id: self.user_id,
            is_privileged: self.role.is_privileged(),
        }
    }
}
