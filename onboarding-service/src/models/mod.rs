mod assignment;

pub use assignment::{
    AssignmentFields, AssignmentSource, CreatedAccount, OrganizationAssignment, OrganizationRole,
    PendingAccountRecord,
};
