#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Student,
    Instructor,
    Admin,
}

impl Role {
    /// Instructors and admins review every submission for a challenge;
    /// students are limited to their own plus unlocked public ones.
    pub fn reviews_all_submissions(self) -> bool {
        matches!(self, Role::Instructor | Role::Admin)
    }
}
