#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use afterschool_api::{
    AppState,
    auth::{AuthUser, Claims},
    config::{AppConfig, LOCAL_JWT_SECRET},
    create_router,
    models::{
        Child, ChildSchedule, ChildUpdate, ClassInstance, Course, EnrolledCourse, Enrollment,
        Instructor, NewChild, NewClassInstance, NewCourse, NewProfile, Parent, ParentChild,
        Profile, ProfileWithRole, Role, Schedule, UpdateProfileRequest,
    },
    repository::{
        ChildStore, ClassInstanceStore, CourseStore, EnrollOutcome, ParentStore, ProfileStore,
        RepoResult, RepositoryState,
    },
};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

// --- In-memory repository ---

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    parents: Vec<Parent>,
    instructors: Vec<Instructor>,
    children: Vec<Child>,
    courses: Vec<Course>,
    class_instances: Vec<ClassInstance>,
    enrollments: Vec<Enrollment>,
    programs: Vec<(i32, String)>,
}

fn next_id<T>(rows: &[T], id: impl Fn(&T) -> i32) -> i32 {
    rows.iter().map(id).max().unwrap_or(0) + 1
}

impl Tables {
    fn program_name(&self, program_id: i32) -> Option<String> {
        self.programs
            .iter()
            .find(|(id, _)| *id == program_id)
            .map(|(_, name)| name.clone())
    }

    fn insert_role_row(&mut self, role: Role, profile_id: i32) {
        match role {
            Role::Instructor if !self.instructors.iter().any(|i| i.profile_id == profile_id) => {
                let instructor_id = next_id(&self.instructors, |i| i.instructor_id);
                self.instructors.push(Instructor {
                    instructor_id,
                    profile_id,
                    rating: 0,
                    bio: String::new(),
                });
            }
            Role::Parent if !self.parents.iter().any(|p| p.profile_id == profile_id) => {
                let parent_id = next_id(&self.parents, |p| p.parent_id);
                self.parents.push(Parent {
                    parent_id,
                    profile_id,
                });
            }
            _ => {}
        }
    }

    fn insert_profile(&mut self, new: NewProfile) -> Profile {
        let profile = Profile {
            profile_id: next_id(&self.profiles, |p| p.profile_id),
            okta_id: new.okta_id,
            role_id: new.role.id(),
            name: new.name,
            email: new.email,
            avatar_url: new.avatar_url,
            created_at: Utc::now(),
        };
        self.profiles.push(profile.clone());
        self.insert_role_row(new.role, profile.profile_id);
        profile
    }

    // Mirrors the ON DELETE CASCADE chain of the schema.
    fn delete_children_of_parent(&mut self, parent_id: i32) {
        let doomed: Vec<i32> = self
            .children
            .iter()
            .filter(|c| c.parent_id == parent_id)
            .map(|c| c.child_id)
            .collect();
        self.children.retain(|c| c.parent_id != parent_id);
        self.enrollments.retain(|e| !doomed.contains(&e.child_id));
    }

    fn delete_courses_of_instructor(&mut self, instructor_id: i32) {
        let doomed: Vec<i32> = self
            .courses
            .iter()
            .filter(|c| c.schedule.instructor_id == instructor_id)
            .map(|c| c.course_id)
            .collect();
        self.courses
            .retain(|c| c.schedule.instructor_id != instructor_id);
        self.class_instances
            .retain(|c| c.schedule.instructor_id != instructor_id);
        self.enrollments.retain(|e| !doomed.contains(&e.course_id));
    }
}

/// InMemoryRepository
///
/// Implements every store over plain vectors so the whole router can be exercised without
/// Postgres. Seeded with the same three programs as the migration.
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        let tables = Tables {
            programs: vec![
                (1, "Codercamp".to_string()),
                (2, "Coderyoga".to_string()),
                (3, "Coderlabs".to_string()),
            ],
            ..Tables::default()
        };
        Self {
            tables: Mutex::new(tables),
        }
    }
}

impl InMemoryRepository {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("in-memory tables poisoned")
    }

    /// Seeds a profile of the given role (with its role row) and returns it.
    pub fn seed_profile(&self, okta_id: &str, name: &str, role: Role) -> Profile {
        self.lock().insert_profile(NewProfile {
            okta_id: okta_id.to_string(),
            name: name.to_string(),
            role,
            email: Some(format!("{okta_id}@example.com")),
            avatar_url: None,
        })
    }

    pub fn parent_of(&self, profile_id: i32) -> Parent {
        self.lock()
            .parents
            .iter()
            .find(|p| p.profile_id == profile_id)
            .cloned()
            .expect("profile has no parent row")
    }

    pub fn instructor_of(&self, profile_id: i32) -> Instructor {
        self.lock()
            .instructors
            .iter()
            .find(|i| i.profile_id == profile_id)
            .cloned()
            .expect("profile has no instructor row")
    }

    pub fn seed_child(&self, parent_id: i32, name: &str, age: i32) -> Child {
        let mut tables = self.lock();
        let child = Child {
            child_id: next_id(&tables.children, |c| c.child_id),
            profile_id: None,
            parent_id,
            name: name.to_string(),
            username: name.to_lowercase(),
            age,
            avatar_url: None,
        };
        tables.children.push(child.clone());
        child
    }

    pub fn seed_course(&self, schedule: Schedule) -> Course {
        let mut tables = self.lock();
        let course = Course {
            course_id: next_id(&tables.courses, |c| c.course_id),
            course_name: "Intro to Scratch".to_string(),
            course_description: "Block-based programming".to_string(),
            program_name: tables.program_name(schedule.program_id),
            schedule,
        };
        tables.courses.push(course.clone());
        course
    }

    pub fn seed_class_instance(&self, schedule: Schedule) -> ClassInstance {
        let mut tables = self.lock();
        let class = ClassInstance {
            class_id: next_id(&tables.class_instances, |c| c.class_id),
            class_name: "Robotics Saturday".to_string(),
            class_description: "Build and program a rover".to_string(),
            program_name: tables.program_name(schedule.program_id),
            schedule,
        };
        tables.class_instances.push(class.clone());
        class
    }

    pub fn enrollment_count(&self, course_id: i32) -> usize {
        self.lock()
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id)
            .count()
    }

    pub fn profile_count(&self) -> usize {
        self.lock().profiles.len()
    }
}

#[async_trait]
impl ProfileStore for InMemoryRepository {
    async fn list_profiles(&self) -> RepoResult<Vec<Profile>> {
        Ok(self.lock().profiles.clone())
    }

    async fn find_profile_by_okta_id(&self, okta_id: &str) -> RepoResult<Option<Profile>> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|p| p.okta_id == okta_id)
            .cloned())
    }

    async fn find_profiles_by_role(&self, role: Role) -> RepoResult<Vec<ProfileWithRole>> {
        let tables = self.lock();
        Ok(tables
            .profiles
            .iter()
            .filter(|p| p.role_id == role.id())
            .map(|p| ProfileWithRole {
                profile: p.clone(),
                instructor_id: tables
                    .instructors
                    .iter()
                    .find(|i| i.profile_id == p.profile_id)
                    .map(|i| i.instructor_id),
                parent_id: tables
                    .parents
                    .iter()
                    .find(|pa| pa.profile_id == p.profile_id)
                    .map(|pa| pa.parent_id),
                child_id: tables
                    .children
                    .iter()
                    .find(|c| c.profile_id == Some(p.profile_id))
                    .map(|c| c.child_id),
            })
            .collect())
    }

    async fn create_profile(&self, profile: NewProfile) -> RepoResult<Profile> {
        Ok(self.lock().insert_profile(profile))
    }

    async fn find_or_create_profile(
        &self,
        okta_id: &str,
        name: &str,
        email: Option<&str>,
    ) -> RepoResult<Profile> {
        let mut tables = self.lock();
        if let Some(existing) = tables.profiles.iter().find(|p| p.okta_id == okta_id) {
            return Ok(existing.clone());
        }
        Ok(tables.insert_profile(NewProfile {
            okta_id: okta_id.to_string(),
            name: name.to_string(),
            role: Role::Parent,
            email: email.map(str::to_string),
            avatar_url: None,
        }))
    }

    async fn update_profile(
        &self,
        okta_id: &str,
        changes: UpdateProfileRequest,
    ) -> RepoResult<Option<Profile>> {
        let mut tables = self.lock();
        let Some(profile) = tables.profiles.iter_mut().find(|p| p.okta_id == okta_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            profile.name = name;
        }
        if changes.email.is_some() {
            profile.email = changes.email;
        }
        if changes.avatar_url.is_some() {
            profile.avatar_url = changes.avatar_url;
        }
        if let Some(role_id) = changes.role_id {
            profile.role_id = role_id;
        }
        let updated = profile.clone();
        tables.insert_role_row(updated.role(), updated.profile_id);
        Ok(Some(updated))
    }

    async fn delete_profile(&self, okta_id: &str) -> RepoResult<Option<Profile>> {
        let mut tables = self.lock();
        let Some(pos) = tables.profiles.iter().position(|p| p.okta_id == okta_id) else {
            return Ok(None);
        };
        let profile = tables.profiles.remove(pos);
        let parent_ids: Vec<i32> = tables
            .parents
            .iter()
            .filter(|p| p.profile_id == profile.profile_id)
            .map(|p| p.parent_id)
            .collect();
        for parent_id in parent_ids {
            tables.delete_children_of_parent(parent_id);
        }
        tables.parents.retain(|p| p.profile_id != profile.profile_id);
        let instructor_ids: Vec<i32> = tables
            .instructors
            .iter()
            .filter(|i| i.profile_id == profile.profile_id)
            .map(|i| i.instructor_id)
            .collect();
        for instructor_id in instructor_ids {
            tables.delete_courses_of_instructor(instructor_id);
        }
        tables
            .instructors
            .retain(|i| i.profile_id != profile.profile_id);
        for child in tables.children.iter_mut() {
            if child.profile_id == Some(profile.profile_id) {
                child.profile_id = None;
            }
        }
        Ok(Some(profile))
    }

    async fn find_instructor(&self, instructor_id: i32) -> RepoResult<Option<Instructor>> {
        Ok(self
            .lock()
            .instructors
            .iter()
            .find(|i| i.instructor_id == instructor_id)
            .cloned())
    }

    async fn find_instructor_by_profile(&self, profile_id: i32) -> RepoResult<Option<Instructor>> {
        Ok(self
            .lock()
            .instructors
            .iter()
            .find(|i| i.profile_id == profile_id)
            .cloned())
    }
}

#[async_trait]
impl ParentStore for InMemoryRepository {
    async fn find_parent(&self, parent_id: i32) -> RepoResult<Option<Parent>> {
        Ok(self
            .lock()
            .parents
            .iter()
            .find(|p| p.parent_id == parent_id)
            .cloned())
    }

    async fn find_parent_by_profile(&self, profile_id: i32) -> RepoResult<Option<Parent>> {
        Ok(self
            .lock()
            .parents
            .iter()
            .find(|p| p.profile_id == profile_id)
            .cloned())
    }

    async fn parent_children(&self, profile_id: i32) -> RepoResult<Vec<ParentChild>> {
        let tables = self.lock();
        let Some(parent) = tables.parents.iter().find(|p| p.profile_id == profile_id) else {
            return Ok(vec![]);
        };
        let rows: Vec<ParentChild> = tables
            .children
            .iter()
            .filter(|c| c.parent_id == parent.parent_id)
            .map(|c| ParentChild {
                parent_id: parent.parent_id,
                profile_id: parent.profile_id,
                child_id: Some(c.child_id),
                name: Some(c.name.clone()),
                username: Some(c.username.clone()),
                age: Some(c.age),
                avatar_url: c.avatar_url.clone(),
            })
            .collect();
        if rows.is_empty() {
            return Ok(vec![ParentChild {
                parent_id: parent.parent_id,
                profile_id: parent.profile_id,
                ..ParentChild::default()
            }]);
        }
        Ok(rows)
    }

    async fn child_schedules(&self, profile_id: i32) -> RepoResult<Vec<ChildSchedule>> {
        let tables = self.lock();
        let Some(parent) = tables.parents.iter().find(|p| p.profile_id == profile_id) else {
            return Ok(vec![]);
        };
        let mut rows = Vec::new();
        for child in tables.children.iter().filter(|c| c.parent_id == parent.parent_id) {
            let base = ChildSchedule {
                parent_id: parent.parent_id,
                child_id: Some(child.child_id),
                child_name: Some(child.name.clone()),
                ..ChildSchedule::default()
            };
            let enrollments: Vec<&Enrollment> = tables
                .enrollments
                .iter()
                .filter(|e| e.child_id == child.child_id)
                .collect();
            if enrollments.is_empty() {
                rows.push(base);
                continue;
            }
            for e in enrollments {
                let course = tables.courses.iter().find(|c| c.course_id == e.course_id);
                rows.push(ChildSchedule {
                    enrollment_id: Some(e.enrollment_id),
                    completed: Some(e.completed),
                    course_id: course.map(|c| c.course_id),
                    course_name: course.map(|c| c.course_name.clone()),
                    days_of_week: course.map(|c| c.schedule.days_of_week.clone()),
                    start_time: course.map(|c| c.schedule.start_time),
                    end_time: course.map(|c| c.schedule.end_time),
                    start_date: course.map(|c| c.schedule.start_date),
                    end_date: course.map(|c| c.schedule.end_date),
                    location: course.map(|c| c.schedule.location.clone()),
                    ..base.clone()
                });
            }
        }
        if rows.is_empty() {
            rows.push(ChildSchedule {
                parent_id: parent.parent_id,
                ..ChildSchedule::default()
            });
        }
        Ok(rows)
    }
}

#[async_trait]
impl ChildStore for InMemoryRepository {
    async fn list_children(&self) -> RepoResult<Vec<Child>> {
        Ok(self.lock().children.clone())
    }

    async fn find_child(&self, child_id: i32) -> RepoResult<Option<Child>> {
        Ok(self
            .lock()
            .children
            .iter()
            .find(|c| c.child_id == child_id)
            .cloned())
    }

    async fn add_child(&self, parent_id: i32, child: NewChild) -> RepoResult<Child> {
        let mut tables = self.lock();
        let child = Child {
            child_id: next_id(&tables.children, |c| c.child_id),
            profile_id: None,
            parent_id,
            name: child.name,
            username: child.username,
            age: child.age,
            avatar_url: child.avatar_url,
        };
        tables.children.push(child.clone());
        Ok(child)
    }

    async fn update_child(&self, child_id: i32, changes: ChildUpdate) -> RepoResult<Option<Child>> {
        let mut tables = self.lock();
        let Some(child) = tables.children.iter_mut().find(|c| c.child_id == child_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            child.name = name;
        }
        if let Some(username) = changes.username {
            child.username = username;
        }
        if let Some(age) = changes.age {
            child.age = age;
        }
        if let Some(avatar_url) = changes.avatar_url {
            child.avatar_url = avatar_url;
        }
        Ok(Some(child.clone()))
    }

    async fn delete_child(&self, child_id: i32) -> RepoResult<bool> {
        let mut tables = self.lock();
        let before = tables.children.len();
        tables.children.retain(|c| c.child_id != child_id);
        tables.enrollments.retain(|e| e.child_id != child_id);
        Ok(tables.children.len() < before)
    }

    async fn enrolled_courses(&self, child_id: i32) -> RepoResult<Vec<EnrolledCourse>> {
        let tables = self.lock();
        Ok(tables
            .enrollments
            .iter()
            .filter(|e| e.child_id == child_id)
            .filter_map(|e| {
                tables
                    .courses
                    .iter()
                    .find(|c| c.course_id == e.course_id)
                    .map(|course| EnrolledCourse {
                        enrollment_id: e.enrollment_id,
                        completed: e.completed,
                        course: course.clone(),
                    })
            })
            .collect())
    }

    async fn enroll_child(&self, child_id: i32, course_id: i32) -> RepoResult<EnrollOutcome> {
        let mut tables = self.lock();
        let Some(course) = tables.courses.iter().find(|c| c.course_id == course_id) else {
            return Ok(EnrollOutcome::CourseNotFound);
        };
        let max_size = course.schedule.max_size as usize;
        if tables
            .enrollments
            .iter()
            .any(|e| e.child_id == child_id && e.course_id == course_id)
        {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }
        let enrolled = tables
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id)
            .count();
        if enrolled >= max_size {
            return Ok(EnrollOutcome::CourseFull);
        }
        let enrollment = Enrollment {
            enrollment_id: next_id(&tables.enrollments, |e| e.enrollment_id),
            child_id,
            course_id,
            completed: false,
        };
        tables.enrollments.push(enrollment.clone());
        Ok(EnrollOutcome::Enrolled(enrollment))
    }

    async fn set_enrollment_completed(
        &self,
        child_id: i32,
        course_id: i32,
        completed: bool,
    ) -> RepoResult<Option<Enrollment>> {
        let mut tables = self.lock();
        Ok(tables
            .enrollments
            .iter_mut()
            .find(|e| e.child_id == child_id && e.course_id == course_id)
            .map(|e| {
                e.completed = completed;
                e.clone()
            }))
    }

    async fn unenroll_child(&self, child_id: i32, course_id: i32) -> RepoResult<bool> {
        let mut tables = self.lock();
        let before = tables.enrollments.len();
        tables
            .enrollments
            .retain(|e| !(e.child_id == child_id && e.course_id == course_id));
        Ok(tables.enrollments.len() < before)
    }
}

#[async_trait]
impl CourseStore for InMemoryRepository {
    async fn list_courses(&self) -> RepoResult<Vec<Course>> {
        Ok(self.lock().courses.clone())
    }

    async fn find_course(&self, course_id: i32) -> RepoResult<Option<Course>> {
        Ok(self
            .lock()
            .courses
            .iter()
            .find(|c| c.course_id == course_id)
            .cloned())
    }

    async fn create_course(&self, course: NewCourse) -> RepoResult<Course> {
        let mut tables = self.lock();
        let course = Course {
            course_id: next_id(&tables.courses, |c| c.course_id),
            course_name: course.course_name,
            course_description: course.course_description,
            program_name: tables.program_name(course.schedule.program_id),
            schedule: course.schedule,
        };
        tables.courses.push(course.clone());
        Ok(course)
    }

    async fn update_course(&self, course_id: i32, course: NewCourse) -> RepoResult<Option<Course>> {
        let mut tables = self.lock();
        let program_name = tables.program_name(course.schedule.program_id);
        Ok(tables
            .courses
            .iter_mut()
            .find(|c| c.course_id == course_id)
            .map(|row| {
                row.course_name = course.course_name;
                row.course_description = course.course_description;
                row.schedule = course.schedule;
                row.program_name = program_name;
                row.clone()
            }))
    }

    async fn delete_course(&self, course_id: i32) -> RepoResult<bool> {
        let mut tables = self.lock();
        let before = tables.courses.len();
        tables.courses.retain(|c| c.course_id != course_id);
        tables.enrollments.retain(|e| e.course_id != course_id);
        Ok(tables.courses.len() < before)
    }

    async fn program_exists(&self, program_id: i32) -> RepoResult<bool> {
        Ok(self.lock().program_name(program_id).is_some())
    }
}

#[async_trait]
impl ClassInstanceStore for InMemoryRepository {
    async fn list_class_instances(&self) -> RepoResult<Vec<ClassInstance>> {
        Ok(self.lock().class_instances.clone())
    }

    async fn find_class_instance(&self, class_id: i32) -> RepoResult<Option<ClassInstance>> {
        Ok(self
            .lock()
            .class_instances
            .iter()
            .find(|c| c.class_id == class_id)
            .cloned())
    }

    async fn create_class_instance(&self, class: NewClassInstance) -> RepoResult<ClassInstance> {
        let mut tables = self.lock();
        let class = ClassInstance {
            class_id: next_id(&tables.class_instances, |c| c.class_id),
            class_name: class.class_name,
            class_description: class.class_description,
            program_name: tables.program_name(class.schedule.program_id),
            schedule: class.schedule,
        };
        tables.class_instances.push(class.clone());
        Ok(class)
    }

    async fn update_class_instance(
        &self,
        class_id: i32,
        class: NewClassInstance,
    ) -> RepoResult<Option<ClassInstance>> {
        let mut tables = self.lock();
        let program_name = tables.program_name(class.schedule.program_id);
        Ok(tables
            .class_instances
            .iter_mut()
            .find(|c| c.class_id == class_id)
            .map(|row| {
                row.class_name = class.class_name;
                row.class_description = class.class_description;
                row.schedule = class.schedule;
                row.program_name = program_name;
                row.clone()
            }))
    }

    async fn delete_class_instance(&self, class_id: i32) -> RepoResult<bool> {
        let mut tables = self.lock();
        let before = tables.class_instances.len();
        tables.class_instances.retain(|c| c.class_id != class_id);
        Ok(tables.class_instances.len() < before)
    }
}

// --- Fixtures ---

/// A valid schedule taught by `instructor_id` in the Codercamp program.
pub fn schedule_for(instructor_id: i32) -> Schedule {
    Schedule {
        days_of_week: vec!["Monday".to_string(), "Wednesday".to_string()],
        max_size: 10,
        min_age: 7,
        max_age: 12,
        instructor_id,
        program_id: 1,
        start_time: NaiveTime::from_hms_opt(15, 30, 0).expect("valid time"),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).expect("valid time"),
        start_date: NaiveDate::from_ymd_opt(2022, 4, 4).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2022, 5, 27).expect("valid date"),
        location: "Room 101".to_string(),
        number_of_sessions: 16,
    }
}

/// JSON body of a full course or class instance for `instructor_id`.
pub fn schedule_body(prefix: &str, instructor_id: i32) -> Value {
    let mut body = serde_json::json!({
        "days_of_week": ["Tuesday", "Thursday"],
        "max_size": 8,
        "min_age": 9,
        "max_age": 14,
        "instructor_id": instructor_id,
        "program_id": 3,
        "start_time": "16:00:00",
        "end_time": "17:30:00",
        "start_date": "2022-06-01",
        "end_date": "2022-07-15",
        "location": "Lab B",
        "number_of_sessions": 12
    });
    body[format!("{prefix}_name")] = Value::from("Web Basics");
    body[format!("{prefix}_description")] = Value::from("HTML and CSS for beginners");
    body
}

pub fn auth_user(profile: &Profile) -> AuthUser {
    AuthUser::from(profile.clone())
}

// --- Test app ---

pub struct TestApp {
    pub repo: Arc<InMemoryRepository>,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let repo = Arc::new(InMemoryRepository::default());
        let state = AppState::new(repo.clone() as RepositoryState, config);
        let router = create_router(state.clone());
        Self {
            repo,
            state,
            router,
        }
    }

    /// Sends a request as `okta_id` (via the local header bypass) and returns the status
    /// and parsed JSON body (`Value::Null` for an empty or non-JSON body).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        okta_id: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(okta_id) = okta_id {
            builder = builder.header("x-okta-id", okta_id);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.call(request).await
    }

    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, okta_id: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(okta_id), None).await
    }

    pub async fn post(&self, uri: &str, okta_id: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(okta_id), Some(body)).await
    }

    pub async fn put(&self, uri: &str, okta_id: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(okta_id), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, okta_id: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(okta_id), None).await
    }
}

// --- Tokens ---

pub fn now_secs() -> usize {
    Utc::now().timestamp() as usize
}

/// Signs claims with the local development secret.
pub fn mint_token(claims: &impl Serialize) -> String {
    mint_token_with(claims, LOCAL_JWT_SECRET)
}

pub fn mint_token_with(claims: &impl Serialize, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token encodes")
}

pub fn claims_for(sub: &str) -> Claims {
    Claims {
        sub: sub.to_string(),
        exp: now_secs() + 3600,
        iat: now_secs(),
        email: Some(format!("{sub}@example.com")),
        name: Some("Jordan Rivera".to_string()),
    }
}
