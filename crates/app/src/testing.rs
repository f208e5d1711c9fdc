//! In-memory implementation of every storage port, shared by service tests.
//!
//! Cloning an [`InMemoryStore`] shares its state, so several services built
//! from clones observe each other's writes.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use gymdesk_domain::{
    attendance::Attendance,
    day::Day,
    error::{ConflictError, GymError, RuleViolation},
    fitness_centre::FitnessCentre,
    id::{
        BodyPartId, ExerciseId, FitnessCentreId, InterchangeRequestId, ShiftId, StaffMemberId,
        UserId,
    },
    interchange::{InterchangeStatus, ShiftInterchangeRequest},
    shift::Shift,
    staff::{StaffMember, StaffMemberProfile},
    user::{Role, User},
    workout::{BodyPart, BodyPartType, Exercise},
};

use crate::ports::{
    AttendanceRepository, FitnessCentreRepository, InterchangeRepository, ShiftRepository,
    StaffRepository, UserRepository, WorkoutRepository,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    staff: HashMap<StaffMemberId, StaffMember>,
    centres: HashMap<FitnessCentreId, FitnessCentre>,
    members: BTreeSet<(FitnessCentreId, UserId)>,
    shifts: HashMap<ShiftId, Shift>,
    attendance: Vec<Attendance>,
    interchanges: HashMap<InterchangeRequestId, ShiftInterchangeRequest>,
    body_parts: HashMap<BodyPartId, BodyPart>,
    exercises: HashMap<ExerciseId, Exercise>,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub(crate) fn seed_user(&self, first_name: &str, role: Role, partner: bool) -> User {
        let user = User::builder()
            .first_name(first_name)
            .email(format!("{}@gym.test", first_name.to_lowercase()))
            .role(role)
            .partner(partner)
            .build()
            .unwrap();
        self.state
            .lock()
            .unwrap()
            .users
            .insert(user.id, user.clone());
        user
    }

    pub(crate) fn seed_staff(&self, first_name: &str, manager: &User) -> (User, StaffMember) {
        let user = self.seed_user(first_name, Role::Staff, false);
        let staff = StaffMember::new(user.id, manager.id);
        self.state
            .lock()
            .unwrap()
            .staff
            .insert(staff.id, staff.clone());
        (user, staff)
    }

    pub(crate) fn seed_body_part(&self, name: &str, kind: BodyPartType) -> BodyPart {
        let part = BodyPart::new(name, kind).unwrap();
        self.state
            .lock()
            .unwrap()
            .body_parts
            .insert(part.id, part.clone());
        part
    }

    pub(crate) fn seed_exercise(&self, name: &str, body_parts: &[BodyPartId]) -> Exercise {
        let exercise = Exercise::new(name, "", "", body_parts.to_vec()).unwrap();
        self.state
            .lock()
            .unwrap()
            .exercises
            .insert(exercise.id, exercise.clone());
        exercise
    }

    pub(crate) fn shift(&self, id: ShiftId) -> Option<Shift> {
        self.state.lock().unwrap().shifts.get(&id).cloned()
    }

    pub(crate) fn staff_member(&self, id: StaffMemberId) -> Option<StaffMember> {
        self.state.lock().unwrap().staff.get(&id).cloned()
    }

    pub(crate) fn interchange(&self, id: InterchangeRequestId) -> Option<ShiftInterchangeRequest> {
        self.state.lock().unwrap().interchanges.get(&id).cloned()
    }
}

fn conflict(what: &'static str) -> GymError {
    ConflictError::Duplicate(what).into()
}

impl UserRepository for InMemoryStore {
    fn create(&self, user: User) -> impl Future<Output = Result<User, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = if state.users.values().any(|u| u.email == user.email) {
            Err(ConflictError::EmailAlreadyExists.into())
        } else {
            state.users.insert(user.id, user.clone());
            Ok(user)
        };
        async { result }
    }

    fn get_by_id(&self, id: UserId) -> impl Future<Output = Result<Option<User>, GymError>> + Send {
        let result = self.state.lock().unwrap().users.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.users.values().find(|u| u.email == email).cloned();
        async { Ok(result) }
    }

    fn find_by_phone(
        &self,
        phone_number: &str,
    ) -> impl Future<Output = Result<Option<User>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state
            .users
            .values()
            .find(|u| u.phone_number.as_deref() == Some(phone_number))
            .cloned();
        async { Ok(result) }
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.users.insert(user.id, user.clone());
        async { Ok(user) }
    }
}

impl StaffRepository for InMemoryStore {
    fn enroll(
        &self,
        user: User,
        staff: StaffMember,
    ) -> impl Future<Output = Result<StaffMemberProfile, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = if state.users.values().any(|u| u.email == user.email) {
            Err(ConflictError::EmailAlreadyExists.into())
        } else {
            state.users.insert(user.id, user.clone());
            state.staff.insert(staff.id, staff.clone());
            Ok(StaffMemberProfile { staff, user })
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: StaffMemberId,
    ) -> impl Future<Output = Result<Option<StaffMember>, GymError>> + Send {
        let result = self.state.lock().unwrap().staff.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> impl Future<Output = Result<Option<StaffMember>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state
            .staff
            .values()
            .find(|s| s.employee_id == employee_id)
            .cloned();
        async { Ok(result) }
    }

    fn find_by_user_id(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<StaffMember>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state.staff.values().find(|s| s.user_id == user_id).cloned();
        async { Ok(result) }
    }

    fn list_by_manager(
        &self,
        manager_id: UserId,
    ) -> impl Future<Output = Result<Vec<StaffMemberProfile>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result: Vec<StaffMemberProfile> = state
            .staff
            .values()
            .filter(|s| s.reports_to(manager_id))
            .filter_map(|s| {
                state.users.get(&s.user_id).map(|u| StaffMemberProfile {
                    staff: s.clone(),
                    user: u.clone(),
                })
            })
            .collect();
        async { Ok(result) }
    }

    fn update(
        &self,
        staff: StaffMember,
    ) -> impl Future<Output = Result<StaffMember, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.staff.insert(staff.id, staff.clone());
        async { Ok(staff) }
    }
}

impl FitnessCentreRepository for InMemoryStore {
    fn create(
        &self,
        centre: FitnessCentre,
    ) -> impl Future<Output = Result<FitnessCentre, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = if state.centres.values().any(|c| c.owner_id == centre.owner_id) {
            Err(ConflictError::CentreAlreadyRegistered.into())
        } else {
            state.centres.insert(centre.id, centre.clone());
            Ok(centre)
        };
        async { result }
    }

    fn find_by_owner(
        &self,
        owner_id: UserId,
    ) -> impl Future<Output = Result<Option<FitnessCentre>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state
            .centres
            .values()
            .find(|c| c.owner_id == owner_id)
            .cloned();
        async { Ok(result) }
    }

    fn add_member(
        &self,
        centre_id: FitnessCentreId,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), GymError>> + Send {
        self.state
            .lock()
            .unwrap()
            .members
            .insert((centre_id, user_id));
        async { Ok(()) }
    }

    fn remove_member(
        &self,
        centre_id: FitnessCentreId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, GymError>> + Send {
        let removed = self
            .state
            .lock()
            .unwrap()
            .members
            .remove(&(centre_id, user_id));
        async move { Ok(removed) }
    }

    fn list_members(
        &self,
        centre_id: FitnessCentreId,
    ) -> impl Future<Output = Result<Vec<User>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result: Vec<User> = state
            .members
            .iter()
            .filter(|(c, _)| *c == centre_id)
            .filter_map(|(_, u)| state.users.get(u).cloned())
            .collect();
        async { Ok(result) }
    }

    fn list_joined(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<FitnessCentre>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result: Vec<FitnessCentre> = state
            .members
            .iter()
            .filter(|(_, u)| *u == user_id)
            .filter_map(|(c, _)| state.centres.get(c).cloned())
            .collect();
        async { Ok(result) }
    }
}

impl ShiftRepository for InMemoryStore {
    fn create(&self, shift: Shift) -> impl Future<Output = Result<Shift, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        let taken = state
            .shifts
            .values()
            .any(|s| s.staff_member_id == shift.staff_member_id && s.day == shift.day);
        let result = if taken {
            Err(conflict("shift"))
        } else {
            state.shifts.insert(shift.id, shift.clone());
            Ok(shift)
        };
        async { result }
    }

    fn update(&self, shift: Shift) -> impl Future<Output = Result<Shift, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        state.shifts.insert(shift.id, shift.clone());
        async { Ok(shift) }
    }

    fn get_by_id(
        &self,
        id: ShiftId,
    ) -> impl Future<Output = Result<Option<Shift>, GymError>> + Send {
        let result = self.state.lock().unwrap().shifts.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_staff_and_day(
        &self,
        staff_member_id: StaffMemberId,
        day: Day,
    ) -> impl Future<Output = Result<Option<Shift>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state
            .shifts
            .values()
            .find(|s| s.staff_member_id == staff_member_id && s.day == day)
            .cloned();
        async { Ok(result) }
    }

    fn list_by_staff(
        &self,
        staff_member_id: StaffMemberId,
    ) -> impl Future<Output = Result<Vec<Shift>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let mut result: Vec<Shift> = state
            .shifts
            .values()
            .filter(|s| s.staff_member_id == staff_member_id)
            .cloned()
            .collect();
        result.sort_by_key(|s| s.day);
        async { Ok(result) }
    }
}

impl AttendanceRepository for InMemoryStore {
    fn create(
        &self,
        attendance: Attendance,
    ) -> impl Future<Output = Result<Attendance, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        let taken = state.attendance.iter().any(|a| {
            a.staff_member_id == attendance.staff_member_id && a.date == attendance.date
        });
        let result = if taken {
            Err(RuleViolation::AttendanceAlreadyMarked.into())
        } else {
            state.attendance.push(attendance.clone());
            Ok(attendance)
        };
        async { result }
    }

    fn exists_for_date(
        &self,
        staff_member_id: StaffMemberId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<bool, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state
            .attendance
            .iter()
            .any(|a| a.staff_member_id == staff_member_id && a.date == date);
        async move { Ok(result) }
    }

    fn list_by_staff(
        &self,
        staff_member_id: StaffMemberId,
    ) -> impl Future<Output = Result<Vec<Attendance>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let mut result: Vec<Attendance> = state
            .attendance
            .iter()
            .filter(|a| a.staff_member_id == staff_member_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        async { Ok(result) }
    }
}

impl InterchangeRepository for InMemoryStore {
    fn create(
        &self,
        request: ShiftInterchangeRequest,
    ) -> impl Future<Output = Result<ShiftInterchangeRequest, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        let taken = state.interchanges.values().any(|r| {
            r.status == InterchangeStatus::Pending
                && r.requester_shift_id == request.requester_shift_id
                && r.target_shift_id == request.target_shift_id
        });
        let result = if taken {
            Err(ConflictError::InterchangeAlreadyPending.into())
        } else {
            state.interchanges.insert(request.id, request.clone());
            Ok(request)
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: InterchangeRequestId,
    ) -> impl Future<Output = Result<Option<ShiftInterchangeRequest>, GymError>> + Send {
        let result = self.state.lock().unwrap().interchanges.get(&id).cloned();
        async { Ok(result) }
    }

    fn find_pending(
        &self,
        requester_shift_id: ShiftId,
        target_shift_id: ShiftId,
    ) -> impl Future<Output = Result<Option<ShiftInterchangeRequest>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let result = state
            .interchanges
            .values()
            .find(|r| {
                r.status == InterchangeStatus::Pending
                    && r.requester_shift_id == requester_shift_id
                    && r.target_shift_id == target_shift_id
            })
            .cloned();
        async { Ok(result) }
    }

    fn list_for_staff(
        &self,
        staff_member_id: StaffMemberId,
    ) -> impl Future<Output = Result<Vec<ShiftInterchangeRequest>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let mut result: Vec<ShiftInterchangeRequest> = state
            .interchanges
            .values()
            .filter(|r| r.involves(staff_member_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        async { Ok(result) }
    }

    fn record_rejection(
        &self,
        request: &ShiftInterchangeRequest,
    ) -> impl Future<Output = Result<(), GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = match state.interchanges.get_mut(&request.id) {
            Some(stored) if stored.status == InterchangeStatus::Pending => {
                *stored = request.clone();
                Ok(())
            }
            _ => Err(RuleViolation::InterchangeNotPending.into()),
        };
        async { result }
    }

    fn approve_with_swap(
        &self,
        request: &ShiftInterchangeRequest,
    ) -> impl Future<Output = Result<ShiftInterchangeRequest, GymError>> + Send {
        let mut state = self.state.lock().unwrap();
        let result = approve_locked(&mut state, request);
        async { result }
    }
}

fn approve_locked(
    state: &mut State,
    request: &ShiftInterchangeRequest,
) -> Result<ShiftInterchangeRequest, GymError> {
    let pending = state
        .interchanges
        .get(&request.id)
        .is_some_and(|r| r.status == InterchangeStatus::Pending);
    if !pending {
        return Err(RuleViolation::InterchangeNotPending.into());
    }
    let stored_shift = |id: ShiftId| {
        state
            .shifts
            .get(&id)
            .cloned()
            .ok_or_else(|| GymError::not_found("Shift", id))
    };
    let mut requester_shift = stored_shift(request.requester_shift_id)?;
    let mut target_shift = stored_shift(request.target_shift_id)?;

    let mut approved = request.clone();
    approved.approve(&mut requester_shift, &mut target_shift)?;
    state.interchanges.insert(approved.id, approved.clone());
    state.shifts.insert(requester_shift.id, requester_shift);
    state.shifts.insert(target_shift.id, target_shift);
    Ok(approved)
}

impl WorkoutRepository for InMemoryStore {
    fn list_body_parts(
        &self,
        kind: Option<BodyPartType>,
    ) -> impl Future<Output = Result<Vec<BodyPart>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let mut result: Vec<BodyPart> = state
            .body_parts
            .values()
            .filter(|part| kind.is_none_or(|kind| part.kind == kind))
            .cloned()
            .collect();
        result.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));
        async { Ok(result) }
    }

    fn get_body_part(
        &self,
        id: BodyPartId,
    ) -> impl Future<Output = Result<Option<BodyPart>, GymError>> + Send {
        let result = self.state.lock().unwrap().body_parts.get(&id).cloned();
        async { Ok(result) }
    }

    fn list_exercises_for(
        &self,
        body_part_id: BodyPartId,
    ) -> impl Future<Output = Result<Vec<Exercise>, GymError>> + Send {
        let state = self.state.lock().unwrap();
        let mut result: Vec<Exercise> = state
            .exercises
            .values()
            .filter(|exercise| exercise.trains(body_part_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        async { Ok(result) }
    }
}
