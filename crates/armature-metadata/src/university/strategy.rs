use tracing::debug;

use armature_model::store::ResourceObject;
use armature_store::FieldError;
use armature_store::strategy::ResourceStrategy;

use super::{
    DEFAULT_MAX_STUDENTS, MAX_STUDENTS_LIMIT, MIN_STUDENTS_LIMIT, UniversitySpec,
};

/// Defaulting and admission policy for universities.
#[derive(Debug, Default)]
pub struct UniversityStrategy;

impl ResourceStrategy for UniversityStrategy {
    type Spec = UniversitySpec;

    fn prepare_for_create(&self, obj: &mut ResourceObject<UniversitySpec>) {
        if obj.spec.max_students.is_none() {
            debug!(name = obj.meta.name(), "defaulting maxStudents");
            obj.spec.max_students = Some(DEFAULT_MAX_STUDENTS);
        }
    }

    fn validate(&self, obj: &ResourceObject<UniversitySpec>) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if obj.spec.faculty_size < 0 {
            errors.push(FieldError::new("spec.facultySize", "may not be negative"));
        }

        match obj.spec.max_students {
            Some(max) if max < MIN_STUDENTS_LIMIT => {
                errors.push(FieldError::new(
                    "spec.maxStudents",
                    format!("must be at least {MIN_STUDENTS_LIMIT}"),
                ));
            }
            Some(max) if max > MAX_STUDENTS_LIMIT => {
                errors.push(FieldError::new(
                    "spec.maxStudents",
                    format!("may not exceed {MAX_STUDENTS_LIMIT}"),
                ));
            }
            Some(_) => {}
            // create defaults the cap, an update may not drop it
            None => {
                errors.push(FieldError::new("spec.maxStudents", "is required"));
            }
        }

        errors
    }
}
