//! In-memory implementations of every port, used by the use-case tests.
//! They mirror the database behaviour that matters to callers: cascades,
//! unique pairs, the primary-image rule and the guarded transitions.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::application::access::OwnerRef;
use crate::application::dto::books::BookInput;
use crate::application::dto::events::EventInput;
use crate::application::dto::lost_found::ItemInput;
use crate::application::dto::roommates::RoommateInput;
use crate::application::ports::book_repository::{BookFilter, BookRepository, NewBook};
use crate::application::ports::book_request_repository::{
    BookRequestRepository, DecisionOutcome,
};
use crate::application::ports::comment_repository::{CommentFilter, CommentRepository};
use crate::application::ports::event_repository::{
    EventCounts, EventFilter, EventRepository, EventVisibility, NewEvent,
};
use crate::application::ports::image_repository::ImageRepository;
use crate::application::ports::lost_found_repository::{
    ItemFilter, LostFoundRepository, NewItem,
};
use crate::application::ports::registration_repository::{
    RegisterOutcome, RegistrationFilter, RegistrationRepository,
};
use crate::application::ports::roommate_repository::{
    NewRoommatePost, RoommateFilter, RoommateRepository,
};
use crate::application::ports::storage_port::{StoragePort, StoredBlob};
use crate::application::ports::user_repository::{NewUser, UserRepository};
use crate::application::use_cases::auth::password::hash_password;
use crate::domain::accounts::user::{Profile, User};
use crate::domain::attachments::image::{Image, ImageParent, successor_primary};
use crate::domain::bookbank::book::{BookPost, Condition, TransactionType};
use crate::domain::bookbank::request::{BookRequest, BookRequestDetail, RequestStatus};
use crate::domain::lostfound::item::{ItemStatus, LostFoundItem, stamp_occurred};
use crate::domain::noticeboard::comment::EventComment;
use crate::domain::noticeboard::event::{Event, EventType};
use crate::domain::noticeboard::registration::EventRegistration;
use crate::domain::roommate::post::{Amenities, RoomType, RoommatePost};

/// Storage metadata for a blob that was never written, for tests that only
/// exercise gallery bookkeeping.
pub(crate) fn blob(key: &str) -> StoredBlob {
    StoredBlob {
        key: key.to_string(),
        size: 0,
        content_hash: String::new(),
    }
}

#[derive(Default)]
struct State {
    seq: i64,
    users: Vec<(User, String)>,
    profiles: HashMap<Uuid, Profile>,
    books: Vec<BookPost>,
    requests: Vec<BookRequest>,
    images: Vec<(ImageParent, Image)>,
    items: Vec<LostFoundItem>,
    events: Vec<Event>,
    registrations: Vec<EventRegistration>,
    comments: Vec<EventComment>,
    roommates: Vec<RoommatePost>,
    blobs: BTreeMap<String, Vec<u8>>,
}

impl State {
    /// Strictly increasing timestamps keep orderings deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        self.seq += 1;
        Utc::now() + Duration::microseconds(self.seq)
    }

    fn parent_owner(&self, parent: ImageParent, parent_id: Uuid) -> Option<OwnerRef> {
        match parent {
            ImageParent::Book => self
                .books
                .iter()
                .find(|b| b.id == parent_id)
                .map(|b| OwnerRef::PostedBy(b.posted_by)),
            ImageParent::Event => self
                .events
                .iter()
                .find(|e| e.id == parent_id)
                .map(|e| OwnerRef::Organizer(e.organizer)),
            ImageParent::Roommate => self
                .roommates
                .iter()
                .find(|p| p.id == parent_id)
                .map(|p| OwnerRef::User(p.user_id)),
        }
    }

    fn drop_gallery(&mut self, parent: ImageParent, parent_id: Uuid) {
        self.images
            .retain(|(p, i)| !(*p == parent && i.parent_id == parent_id));
    }

    fn delete_book(&mut self, id: Uuid) -> bool {
        let before = self.books.len();
        self.books.retain(|b| b.id != id);
        self.requests.retain(|r| r.book_id != id);
        self.drop_gallery(ImageParent::Book, id);
        before != self.books.len()
    }

    fn delete_event(&mut self, id: Uuid) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.registrations.retain(|r| r.event_id != id);
        self.comments.retain(|c| c.event_id != id);
        self.drop_gallery(ImageParent::Event, id);
        before != self.events.len()
    }

    fn delete_roommate(&mut self, id: Uuid) -> bool {
        let before = self.roommates.len();
        self.roommates.retain(|p| p.id != id);
        self.drop_gallery(ImageParent::Roommate, id);
        before != self.roommates.len()
    }

    fn request_detail(&self, request: &BookRequest) -> Option<BookRequestDetail> {
        let book = self.books.iter().find(|b| b.id == request.book_id)?;
        Some(BookRequestDetail {
            request: request.clone(),
            book_title: book.title.clone(),
            book_owner: book.posted_by,
            book_available: book.is_available,
        })
    }

    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().map(|(u, _)| u).find(|u| u.id == id)
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn opt_contains(haystack: &Option<String>, needle: &str) -> bool {
    haystack.as_deref().map(|h| contains(h, needle)).unwrap_or(false)
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Seeds an active account whose password can never verify.
    pub fn seed_user(&self, email: &str, is_staff: bool) -> User {
        self.insert_user(email, "!unusable".into(), is_staff)
    }

    pub fn seed_user_with_password(&self, email: &str, password: &str, is_staff: bool) -> User {
        let hash = hash_password(password).unwrap();
        self.insert_user(email, hash, is_staff)
    }

    fn insert_user(&self, email: &str, hash: String, is_staff: bool) -> User {
        let mut s = self.lock();
        let now = s.tick();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            mobile: format!("+1555{:07}", s.seq),
            address: None,
            is_active: true,
            is_staff,
            is_superuser: false,
            date_joined: now,
            last_login: None,
        };
        s.users.push((user.clone(), hash));
        user
    }

    pub fn deactivate(&self, id: Uuid) {
        let mut s = self.lock();
        if let Some((user, _)) = s.users.iter_mut().find(|(u, _)| u.id == id) {
            user.is_active = false;
        }
    }

    pub fn seed_book(&self, owner: Uuid) -> BookPost {
        let mut s = self.lock();
        let now = s.tick();
        let book = BookPost {
            id: Uuid::new_v4(),
            title: "Linear Algebra".into(),
            author: "Strang".into(),
            isbn: None,
            description: None,
            condition: Condition::Good,
            price: Some(Decimal::new(2500, 2)),
            transaction_type: TransactionType::Sell,
            department: "Mathematics".into(),
            course_code: Some("MATH201".into()),
            posted_by: owner,
            contact_email: "seller@campus.edu".into(),
            contact_phone: None,
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        s.books.push(book.clone());
        book
    }

    pub fn set_book_available(&self, id: Uuid, available: bool) {
        let mut s = self.lock();
        if let Some(book) = s.books.iter_mut().find(|b| b.id == id) {
            book.is_available = available;
        }
    }

    pub fn seed_request(&self, book_id: Uuid, user_id: Uuid) -> BookRequest {
        let mut s = self.lock();
        let now = s.tick();
        let request = BookRequest {
            id: Uuid::new_v4(),
            book_id,
            requested_by: user_id,
            message: None,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        s.requests.push(request.clone());
        request
    }

    pub fn seed_item(&self, reporter: Uuid) -> LostFoundItem {
        let mut s = self.lock();
        let now = s.tick();
        let item = LostFoundItem {
            id: Uuid::new_v4(),
            item_name: "Blue backpack".into(),
            description: None,
            status: ItemStatus::Lost,
            location: Some("Library".into()),
            date_reported: now,
            date_occurred: None,
            reporter,
            claimed_by: None,
            is_resolved: false,
            image_key: None,
            contact_info: None,
            category: Some("bags".into()),
            color: Some("blue".into()),
            brand: None,
            created_at: now,
            updated_at: now,
        };
        s.items.push(item.clone());
        item
    }

    pub fn seed_event(&self, organizer: Uuid, approved: bool) -> Event {
        let mut s = self.lock();
        let now = s.tick();
        let event = Event {
            id: Uuid::new_v4(),
            title: "Hack night".into(),
            description: "Bring a laptop".into(),
            event_type: EventType::Workshop,
            start_datetime: now + Duration::days(7),
            end_datetime: now + Duration::days(7) + Duration::hours(3),
            location: "Lab 3".into(),
            location_url: None,
            organizer,
            is_online: false,
            meeting_link: None,
            max_participants: None,
            is_free: true,
            price: Decimal::ZERO,
            registration_required: true,
            registration_deadline: None,
            is_approved: approved,
            created_at: now,
            updated_at: now,
        };
        s.events.push(event.clone());
        event
    }

    pub fn update_event(&self, id: Uuid, f: impl FnOnce(&mut Event)) {
        let mut s = self.lock();
        if let Some(event) = s.events.iter_mut().find(|e| e.id == id) {
            f(event);
        }
    }

    pub fn mark_attended(&self, event_id: Uuid, user_id: Uuid) {
        let mut s = self.lock();
        for r in s
            .registrations
            .iter_mut()
            .filter(|r| r.event_id == event_id && r.user_id == user_id)
        {
            r.attended = true;
        }
    }

    pub fn seed_comment(&self, event_id: Uuid, user_id: Uuid, content: &str) -> EventComment {
        let mut s = self.lock();
        let now = s.tick();
        let comment = EventComment {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        s.comments.push(comment.clone());
        comment
    }

    pub fn seed_roommate_post(&self, user_id: Uuid) -> RoommatePost {
        let mut s = self.lock();
        let now = s.tick();
        let post = RoommatePost {
            id: Uuid::new_v4(),
            user_id,
            title: "Room in shared flat".into(),
            description: "Ten minutes from campus".into(),
            location: "North Gate".into(),
            rent: Decimal::new(350, 0),
            available_from: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            lease_duration: 12,
            room_type: RoomType::Shared,
            preferred_gender: Default::default(),
            current_occupants: 1,
            total_occupants: 2,
            amenities: Amenities::default(),
            occupation: Default::default(),
            university: None,
            contact_number: "+15550000000".into(),
            contact_email: "host@campus.edu".into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        s.roommates.push(post.clone());
        post
    }

    pub fn update_roommate_post(&self, id: Uuid, f: impl FnOnce(&mut RoommatePost)) {
        let mut s = self.lock();
        if let Some(post) = s.roommates.iter_mut().find(|p| p.id == id) {
            f(post);
        }
    }

    pub fn primary_count(&self, parent: ImageParent, parent_id: Uuid) -> usize {
        self.lock()
            .images
            .iter()
            .filter(|(p, i)| *p == parent && i.parent_id == parent_id && i.is_primary)
            .count()
    }

    pub fn blob_keys(&self) -> Vec<String> {
        self.lock().blobs.keys().cloned().collect()
    }
}

pub fn book_input(title: &str) -> BookInput {
    BookInput {
        title: title.to_string(),
        author: "Anon".into(),
        isbn: None,
        description: None,
        condition: None,
        price: Some(Decimal::new(1000, 2)),
        transaction_type: None,
        department: "Mathematics".into(),
        course_code: None,
        contact_email: None,
        contact_phone: None,
    }
}

pub fn item_input(name: &str) -> ItemInput {
    ItemInput {
        item_name: name.to_string(),
        description: None,
        status: None,
        location: Some("Cafeteria".into()),
        date_occurred: None,
        contact_info: None,
        category: None,
        color: None,
        brand: None,
    }
}

pub fn event_input(title: &str) -> EventInput {
    let start = Utc::now() + Duration::days(10);
    EventInput {
        title: title.to_string(),
        description: "All welcome".into(),
        event_type: None,
        start_datetime: start,
        end_datetime: start + Duration::hours(2),
        location: "Main hall".into(),
        location_url: None,
        is_online: false,
        meeting_link: None,
        max_participants: None,
        is_free: None,
        price: None,
        registration_required: false,
        registration_deadline: None,
    }
}

pub fn roommate_input(title: &str) -> RoommateInput {
    RoommateInput {
        title: title.to_string(),
        description: "Quiet flat".into(),
        location: "East campus".into(),
        rent: Decimal::new(400, 0),
        available_from: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        lease_duration: 6,
        room_type: RoomType::Private,
        preferred_gender: None,
        current_occupants: None,
        total_occupants: None,
        has_furniture: None,
        has_parking: None,
        has_laundry: None,
        has_kitchen: None,
        has_wifi: None,
        is_pets_allowed: None,
        is_smoking_allowed: None,
        occupation: None,
        university: None,
        contact_number: "+15551234567".into(),
        contact_email: None,
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> anyhow::Result<User> {
        let mut s = self.lock();
        let now = s.tick();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            name: user.name.clone(),
            mobile: user.mobile.clone(),
            address: user.address.clone(),
            is_active: true,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            date_joined: now,
            last_login: None,
        };
        s.users.push((created.clone(), user.password_hash.clone()));
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.lock().user(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .map(|(u, _)| u)
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_mobile(&self, mobile: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .map(|(u, _)| u)
            .find(|u| u.mobile == mobile)
            .cloned())
    }

    async fn password_hash(&self, id: Uuid) -> anyhow::Result<Option<String>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(_, h)| h.clone()))
    }

    async fn list_users(&self, search: Option<&str>) -> anyhow::Result<Vec<User>> {
        let s = self.lock();
        let mut users: Vec<User> = s
            .users
            .iter()
            .map(|(u, _)| u)
            .filter(|u| {
                search
                    .map(|q| contains(&u.email, q) || contains(&u.name, q) || contains(&u.mobile, q))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| b.date_joined.cmp(&a.date_joined));
        Ok(users)
    }

    async fn update_user(&self, user: &User) -> anyhow::Result<Option<User>> {
        let mut s = self.lock();
        Ok(s.users
            .iter_mut()
            .find(|(u, _)| u.id == user.id)
            .map(|(stored, _)| {
                stored.name = user.name.clone();
                stored.mobile = user.mobile.clone();
                stored.address = user.address.clone();
                stored.is_active = user.is_active;
                stored.is_staff = user.is_staff;
                stored.is_superuser = user.is_superuser;
                stored.clone()
            }))
    }

    async fn set_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        let mut s = self.lock();
        if let Some((_, hash)) = s.users.iter_mut().find(|(u, _)| u.id == id) {
            *hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid) -> anyhow::Result<()> {
        let mut s = self.lock();
        let now = s.tick();
        if let Some((user, _)) = s.users.iter_mut().find(|(u, _)| u.id == id) {
            user.last_login = Some(now);
        }
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut s = self.lock();
        let before = s.users.len();
        s.users.retain(|(u, _)| u.id != id);
        if before == s.users.len() {
            return Ok(false);
        }
        s.profiles.remove(&id);
        let books: Vec<Uuid> = s.books.iter().filter(|b| b.posted_by == id).map(|b| b.id).collect();
        for book in books {
            s.delete_book(book);
        }
        s.requests.retain(|r| r.requested_by != id);
        s.items.retain(|i| i.reporter != id);
        for item in s.items.iter_mut().filter(|i| i.claimed_by == Some(id)) {
            item.claimed_by = None;
        }
        let events: Vec<Uuid> = s.events.iter().filter(|e| e.organizer == id).map(|e| e.id).collect();
        for event in events {
            s.delete_event(event);
        }
        s.registrations.retain(|r| r.user_id != id);
        s.comments.retain(|c| c.user_id != id);
        let posts: Vec<Uuid> = s.roommates.iter().filter(|p| p.user_id == id).map(|p| p.id).collect();
        for post in posts {
            s.delete_roommate(post);
        }
        Ok(true)
    }

    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Profile> {
        Ok(self.lock().profiles.get(&user_id).cloned().unwrap_or_default())
    }

    async fn save_profile(&self, user_id: Uuid, profile: &Profile) -> anyhow::Result<Profile> {
        self.lock().profiles.insert(user_id, profile.clone());
        Ok(profile.clone())
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn list(&self, filter: &BookFilter) -> anyhow::Result<Vec<BookPost>> {
        let s = self.lock();
        let mut books: Vec<BookPost> = s
            .books
            .iter()
            .filter(|b| {
                filter.search.as_deref().map_or(true, |q| {
                    contains(&b.title, q)
                        || contains(&b.author, q)
                        || opt_contains(&b.isbn, q)
                        || opt_contains(&b.course_code, q)
                })
            })
            .filter(|b| filter.department.as_deref().map_or(true, |d| b.department == d))
            .filter(|b| filter.transaction_type.map_or(true, |t| b.transaction_type == t))
            .filter(|b| filter.condition.map_or(true, |c| b.condition == c))
            .filter(|b| filter.is_available.map_or(true, |a| b.is_available == a))
            .filter(|b| filter.posted_by.map_or(true, |p| b.posted_by == p))
            .cloned()
            .collect();
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(books)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<BookPost>> {
        Ok(self.lock().books.iter().find(|b| b.id == id).cloned())
    }

    async fn isbn_in_use(&self, isbn: &str, except: Option<Uuid>) -> anyhow::Result<bool> {
        Ok(self
            .lock()
            .books
            .iter()
            .any(|b| b.isbn.as_deref() == Some(isbn) && Some(b.id) != except))
    }

    async fn create(&self, book: &NewBook) -> anyhow::Result<BookPost> {
        let mut s = self.lock();
        let now = s.tick();
        let created = BookPost {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            description: book.description.clone(),
            condition: book.condition,
            price: book.price,
            transaction_type: book.transaction_type,
            department: book.department.clone(),
            course_code: book.course_code.clone(),
            posted_by: book.posted_by,
            contact_email: book.contact_email.clone(),
            contact_phone: book.contact_phone.clone(),
            is_available: true,
            created_at: now,
            updated_at: now,
        };
        s.books.push(created.clone());
        Ok(created)
    }

    async fn update(&self, book: &BookPost) -> anyhow::Result<Option<BookPost>> {
        let mut s = self.lock();
        let now = s.tick();
        Ok(s.books.iter_mut().find(|b| b.id == book.id).map(|stored| {
            let keep = (stored.is_available, stored.posted_by, stored.created_at);
            *stored = book.clone();
            (stored.is_available, stored.posted_by, stored.created_at) = keep;
            stored.updated_at = now;
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.lock().delete_book(id))
    }
}

#[async_trait]
impl BookRequestRepository for InMemoryStore {
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<BookRequestDetail>> {
        let s = self.lock();
        let mut out: Vec<BookRequestDetail> = s
            .requests
            .iter()
            .filter_map(|r| s.request_detail(r))
            .filter(|d| d.request.requested_by == user_id || d.book_owner == user_id)
            .collect();
        out.sort_by(|a, b| b.request.created_at.cmp(&a.request.created_at));
        Ok(out)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<BookRequestDetail>> {
        let s = self.lock();
        let mut out: Vec<BookRequestDetail> =
            s.requests.iter().filter_map(|r| s.request_detail(r)).collect();
        out.sort_by(|a, b| b.request.created_at.cmp(&a.request.created_at));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<BookRequestDetail>> {
        let s = self.lock();
        Ok(s.requests
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| s.request_detail(r)))
    }

    async fn exists(&self, book_id: Uuid, requested_by: Uuid) -> anyhow::Result<bool> {
        Ok(self
            .lock()
            .requests
            .iter()
            .any(|r| r.book_id == book_id && r.requested_by == requested_by))
    }

    async fn create(
        &self,
        book_id: Uuid,
        requested_by: Uuid,
        message: Option<&str>,
    ) -> anyhow::Result<Option<BookRequest>> {
        let mut s = self.lock();
        if s.requests
            .iter()
            .any(|r| r.book_id == book_id && r.requested_by == requested_by)
        {
            return Ok(None);
        }
        let now = s.tick();
        let request = BookRequest {
            id: Uuid::new_v4(),
            book_id,
            requested_by,
            message: message.map(str::to_string),
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        s.requests.push(request.clone());
        Ok(Some(request))
    }

    async fn accept(&self, id: Uuid) -> anyhow::Result<DecisionOutcome> {
        let mut s = self.lock();
        let now = s.tick();
        let Some(idx) = s.requests.iter().position(|r| r.id == id) else {
            return Ok(DecisionOutcome::Missing);
        };
        if s.requests[idx].status != RequestStatus::Pending {
            return Ok(DecisionOutcome::NotPending(s.requests[idx].status));
        }
        let book_id = s.requests[idx].book_id;
        match s.books.iter_mut().find(|b| b.id == book_id) {
            Some(book) if book.is_available => book.is_available = false,
            Some(_) => return Ok(DecisionOutcome::BookUnavailable),
            None => return Ok(DecisionOutcome::Missing),
        }
        let request = &mut s.requests[idx];
        request.status = RequestStatus::Accepted;
        request.updated_at = now;
        Ok(DecisionOutcome::Applied(request.clone()))
    }

    async fn reject(&self, id: Uuid) -> anyhow::Result<DecisionOutcome> {
        let mut s = self.lock();
        let now = s.tick();
        let Some(request) = s.requests.iter_mut().find(|r| r.id == id) else {
            return Ok(DecisionOutcome::Missing);
        };
        if request.status != RequestStatus::Pending {
            return Ok(DecisionOutcome::NotPending(request.status));
        }
        request.status = RequestStatus::Rejected;
        request.updated_at = now;
        Ok(DecisionOutcome::Applied(request.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut s = self.lock();
        let before = s.requests.len();
        s.requests.retain(|r| r.id != id);
        Ok(before != s.requests.len())
    }
}

#[async_trait]
impl ImageRepository for InMemoryStore {
    async fn parent_owner(
        &self,
        parent: ImageParent,
        parent_id: Uuid,
    ) -> anyhow::Result<Option<OwnerRef>> {
        Ok(self.lock().parent_owner(parent, parent_id))
    }

    async fn list(&self, parent: ImageParent, parent_id: Uuid) -> anyhow::Result<Vec<Image>> {
        self.list_for_parents(parent, &[parent_id]).await
    }

    async fn list_for_parents(
        &self,
        parent: ImageParent,
        parent_ids: &[Uuid],
    ) -> anyhow::Result<Vec<Image>> {
        Ok(self
            .lock()
            .images
            .iter()
            .filter(|(p, i)| *p == parent && parent_ids.contains(&i.parent_id))
            .map(|(_, i)| i.clone())
            .collect())
    }

    async fn get(&self, parent: ImageParent, image_id: Uuid) -> anyhow::Result<Option<Image>> {
        Ok(self
            .lock()
            .images
            .iter()
            .find(|(p, i)| *p == parent && i.id == image_id)
            .map(|(_, i)| i.clone()))
    }

    async fn add(
        &self,
        parent: ImageParent,
        parent_id: Uuid,
        blob: &StoredBlob,
        promote: bool,
    ) -> anyhow::Result<Image> {
        let mut s = self.lock();
        let now = s.tick();
        let siblings = s
            .images
            .iter()
            .filter(|(p, i)| *p == parent && i.parent_id == parent_id)
            .count();
        let is_primary = siblings == 0 || promote;
        if is_primary {
            for (_, img) in s
                .images
                .iter_mut()
                .filter(|(p, i)| *p == parent && i.parent_id == parent_id)
            {
                img.is_primary = false;
            }
        }
        let image = Image {
            id: Uuid::new_v4(),
            parent_id,
            storage_key: blob.key.clone(),
            size_bytes: blob.size,
            content_hash: blob.content_hash.clone(),
            is_primary,
            uploaded_at: now,
        };
        s.images.push((parent, image.clone()));
        Ok(image)
    }

    async fn set_primary(
        &self,
        parent: ImageParent,
        image_id: Uuid,
    ) -> anyhow::Result<Option<Image>> {
        let mut s = self.lock();
        let Some(parent_id) = s
            .images
            .iter()
            .find(|(p, i)| *p == parent && i.id == image_id)
            .map(|(_, i)| i.parent_id)
        else {
            return Ok(None);
        };
        let mut target = None;
        for (_, img) in s
            .images
            .iter_mut()
            .filter(|(p, i)| *p == parent && i.parent_id == parent_id)
        {
            img.is_primary = img.id == image_id;
            if img.is_primary {
                target = Some(img.clone());
            }
        }
        Ok(target)
    }

    async fn remove(&self, parent: ImageParent, image_id: Uuid) -> anyhow::Result<Option<Image>> {
        let mut s = self.lock();
        let Some(idx) = s
            .images
            .iter()
            .position(|(p, i)| *p == parent && i.id == image_id)
        else {
            return Ok(None);
        };
        let (_, removed) = s.images.remove(idx);
        let remaining: Vec<Image> = s
            .images
            .iter()
            .filter(|(p, i)| *p == parent && i.parent_id == removed.parent_id)
            .map(|(_, i)| i.clone())
            .collect();
        if let Some(next) = successor_primary(&remaining).map(|i| i.id) {
            if let Some((_, img)) = s.images.iter_mut().find(|(_, i)| i.id == next) {
                img.is_primary = true;
            }
        }
        Ok(Some(removed))
    }

    async fn keys_owned_by(&self, user_id: Uuid) -> anyhow::Result<Vec<String>> {
        let s = self.lock();
        Ok(s.images
            .iter()
            .filter(|(p, i)| {
                s.parent_owner(*p, i.parent_id)
                    .map(|o| o.owner_id() == user_id)
                    .unwrap_or(false)
            })
            .map(|(_, i)| i.storage_key.clone())
            .collect())
    }
}

#[async_trait]
impl LostFoundRepository for InMemoryStore {
    async fn list(&self, filter: &ItemFilter) -> anyhow::Result<Vec<LostFoundItem>> {
        let s = self.lock();
        let mut items: Vec<LostFoundItem> = s
            .items
            .iter()
            .filter(|i| filter.status.map_or(true, |st| i.status == st))
            .filter(|i| filter.is_resolved.map_or(true, |r| i.is_resolved == r))
            .filter(|i| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| i.category.as_deref() == Some(c))
            })
            .filter(|i| {
                filter.search.as_deref().map_or(true, |q| {
                    contains(&i.item_name, q)
                        || opt_contains(&i.description, q)
                        || opt_contains(&i.location, q)
                })
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.date_reported.cmp(&a.date_reported));
        Ok(items)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<LostFoundItem>> {
        Ok(self.lock().items.iter().find(|i| i.id == id).cloned())
    }

    async fn create(&self, item: &NewItem) -> anyhow::Result<LostFoundItem> {
        let mut s = self.lock();
        let now = s.tick();
        let created = LostFoundItem {
            id: Uuid::new_v4(),
            item_name: item.item_name.clone(),
            description: item.description.clone(),
            status: item.status,
            location: item.location.clone(),
            date_reported: now,
            date_occurred: item.date_occurred,
            reporter: item.reporter,
            claimed_by: None,
            is_resolved: false,
            image_key: None,
            contact_info: item.contact_info.clone(),
            category: item.category.clone(),
            color: item.color.clone(),
            brand: item.brand.clone(),
            created_at: now,
            updated_at: now,
        };
        s.items.push(created.clone());
        Ok(created)
    }

    async fn update(&self, item: &LostFoundItem) -> anyhow::Result<Option<LostFoundItem>> {
        let mut s = self.lock();
        let now = s.tick();
        Ok(s.items.iter_mut().find(|i| i.id == item.id).map(|stored| {
            let keep = (
                stored.status,
                stored.is_resolved,
                stored.reporter,
                stored.claimed_by,
                stored.image_key.clone(),
                stored.date_reported,
                stored.created_at,
            );
            *stored = item.clone();
            (
                stored.status,
                stored.is_resolved,
                stored.reporter,
                stored.claimed_by,
                stored.image_key,
                stored.date_reported,
                stored.created_at,
            ) = keep;
            stored.updated_at = now;
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut s = self.lock();
        let before = s.items.len();
        s.items.retain(|i| i.id != id);
        Ok(before != s.items.len())
    }

    async fn mark_found(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<LostFoundItem>> {
        let mut s = self.lock();
        Ok(s.items
            .iter_mut()
            .find(|i| i.id == id && i.status != ItemStatus::Found)
            .map(|item| {
                item.status = ItemStatus::Found;
                item.is_resolved = true;
                item.date_occurred = stamp_occurred(ItemStatus::Found, item.date_occurred, now);
                item.updated_at = now;
                item.clone()
            }))
    }

    async fn claim(&self, id: Uuid, claimant: Uuid) -> anyhow::Result<Option<LostFoundItem>> {
        let mut s = self.lock();
        Ok(s.items
            .iter_mut()
            .find(|i| i.id == id && i.claimed_by.is_none())
            .map(|item| {
                item.claimed_by = Some(claimant);
                item.is_resolved = true;
                item.clone()
            }))
    }

    async fn unclaim(&self, id: Uuid, claimant: Uuid) -> anyhow::Result<Option<LostFoundItem>> {
        let mut s = self.lock();
        Ok(s.items
            .iter_mut()
            .find(|i| i.id == id && i.claimed_by == Some(claimant))
            .map(|item| {
                item.claimed_by = None;
                item.is_resolved = false;
                item.clone()
            }))
    }

    async fn set_image(&self, id: Uuid, key: Option<&str>) -> anyhow::Result<Option<String>> {
        let mut s = self.lock();
        Ok(s.items
            .iter_mut()
            .find(|i| i.id == id)
            .and_then(|item| std::mem::replace(&mut item.image_key, key.map(str::to_string))))
    }

    async fn image_keys_for_reporter(&self, reporter: Uuid) -> anyhow::Result<Vec<String>> {
        Ok(self
            .lock()
            .items
            .iter()
            .filter(|i| i.reporter == reporter)
            .filter_map(|i| i.image_key.clone())
            .collect())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn list(&self, filter: &EventFilter) -> anyhow::Result<Vec<Event>> {
        let s = self.lock();
        let now = filter.now;
        let mut events: Vec<Event> = s
            .events
            .iter()
            .filter(|e| match filter.visibility {
                EventVisibility::All => true,
                EventVisibility::ApprovedOnly => e.is_approved,
                EventVisibility::ApprovedOrOrganizedBy(u) => e.is_approved || e.organizer == u,
            })
            .filter(|e| filter.is_upcoming.map_or(true, |v| (e.start_datetime > now) == v))
            .filter(|e| filter.is_past.map_or(true, |v| (e.end_datetime < now) == v))
            .filter(|e| filter.event_type.map_or(true, |t| e.event_type == t))
            .filter(|e| filter.is_online.map_or(true, |v| e.is_online == v))
            .filter(|e| filter.is_free.map_or(true, |v| e.is_free == v))
            .filter(|e| {
                filter
                    .registration_required
                    .map_or(true, |v| e.registration_required == v)
            })
            .filter(|e| filter.is_approved.map_or(true, |v| e.is_approved == v))
            .filter(|e| filter.start_date.map_or(true, |d| e.start_datetime.date_naive() >= d))
            .filter(|e| filter.end_date.map_or(true, |d| e.end_datetime.date_naive() <= d))
            .filter(|e| {
                filter.search.as_deref().map_or(true, |q| {
                    contains(&e.title, q) || contains(&e.description, q) || contains(&e.location, q)
                })
            })
            .cloned()
            .collect();
        events.sort_by(|a, b| a.start_datetime.cmp(&b.start_datetime));
        Ok(events)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Event>> {
        Ok(self.lock().events.iter().find(|e| e.id == id).cloned())
    }

    async fn create(&self, event: &NewEvent) -> anyhow::Result<Event> {
        let mut s = self.lock();
        let now = s.tick();
        let created = Event {
            id: Uuid::new_v4(),
            title: event.title.clone(),
            description: event.description.clone(),
            event_type: event.event_type,
            start_datetime: event.start_datetime,
            end_datetime: event.end_datetime,
            location: event.location.clone(),
            location_url: event.location_url.clone(),
            organizer: event.organizer,
            is_online: event.is_online,
            meeting_link: event.meeting_link.clone(),
            max_participants: event.max_participants,
            is_free: event.is_free,
            price: event.price,
            registration_required: event.registration_required,
            registration_deadline: event.registration_deadline,
            is_approved: event.is_approved,
            created_at: now,
            updated_at: now,
        };
        s.events.push(created.clone());
        Ok(created)
    }

    async fn update(&self, event: &Event) -> anyhow::Result<Option<Event>> {
        let mut s = self.lock();
        let now = s.tick();
        Ok(s.events.iter_mut().find(|e| e.id == event.id).map(|stored| {
            let keep = (stored.organizer, stored.is_approved, stored.created_at);
            *stored = event.clone();
            (stored.organizer, stored.is_approved, stored.created_at) = keep;
            stored.updated_at = now;
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.lock().delete_event(id))
    }

    async fn set_approved(&self, id: Uuid, approved: bool) -> anyhow::Result<Option<Event>> {
        let mut s = self.lock();
        Ok(s.events.iter_mut().find(|e| e.id == id).map(|e| {
            e.is_approved = approved;
            e.clone()
        }))
    }

    async fn counts(&self, id: Uuid) -> anyhow::Result<EventCounts> {
        let s = self.lock();
        let regs = s.registrations.iter().filter(|r| r.event_id == id);
        Ok(EventCounts {
            total_registrations: regs.clone().count() as i64,
            attended_registrations: regs.filter(|r| r.attended).count() as i64,
            comments: s.comments.iter().filter(|c| c.event_id == id).count() as i64,
            images: s
                .images
                .iter()
                .filter(|(p, i)| *p == ImageParent::Event && i.parent_id == id)
                .count() as i64,
        })
    }

    async fn registration_counts(&self, ids: &[Uuid]) -> anyhow::Result<HashMap<Uuid, i64>> {
        let s = self.lock();
        let mut out = HashMap::new();
        for r in s.registrations.iter().filter(|r| ids.contains(&r.event_id)) {
            *out.entry(r.event_id).or_insert(0) += 1;
        }
        Ok(out)
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryStore {
    async fn register(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<RegisterOutcome> {
        let mut s = self.lock();
        let Some(event) = s.events.iter().find(|e| e.id == event_id).cloned() else {
            return Ok(RegisterOutcome::EventMissing);
        };
        if let Some(existing) = s
            .registrations
            .iter()
            .find(|r| r.event_id == event_id && r.user_id == user_id)
        {
            return Ok(RegisterOutcome::Existing(existing.clone()));
        }
        let registered = s
            .registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .count() as i64;
        if let Some(reason) = event.registration_refusal(registered, now) {
            return Ok(RegisterOutcome::Refused(reason));
        }
        let stamp = s.tick();
        let registration = EventRegistration {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            registration_date: stamp,
            attended: false,
            notes: notes.map(str::to_string),
        };
        s.registrations.push(registration.clone());
        Ok(RegisterOutcome::Created(registration))
    }

    async fn list(&self, filter: &RegistrationFilter) -> anyhow::Result<Vec<EventRegistration>> {
        let s = self.lock();
        let mut out: Vec<EventRegistration> = s
            .registrations
            .iter()
            .filter(|r| filter.event_id.map_or(true, |e| r.event_id == e))
            .filter(|r| filter.user_id.map_or(true, |u| r.user_id == u))
            .filter(|r| filter.attended.map_or(true, |a| r.attended == a))
            .filter(|r| {
                filter.search.as_deref().map_or(true, |q| {
                    let title = s
                        .events
                        .iter()
                        .find(|e| e.id == r.event_id)
                        .map(|e| contains(&e.title, q))
                        .unwrap_or(false);
                    let person = s
                        .user(r.user_id)
                        .map(|u| contains(&u.name, q) || contains(&u.email, q))
                        .unwrap_or(false);
                    title || person
                })
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.registration_date.cmp(&a.registration_date));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<EventRegistration>> {
        Ok(self.lock().registrations.iter().find(|r| r.id == id).cloned())
    }

    async fn update(
        &self,
        registration: &EventRegistration,
    ) -> anyhow::Result<Option<EventRegistration>> {
        let mut s = self.lock();
        Ok(s.registrations
            .iter_mut()
            .find(|r| r.id == registration.id)
            .map(|stored| {
                stored.attended = registration.attended;
                stored.notes = registration.notes.clone();
                stored.clone()
            }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut s = self.lock();
        let before = s.registrations.len();
        s.registrations.retain(|r| r.id != id);
        Ok(before != s.registrations.len())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list(&self, filter: &CommentFilter) -> anyhow::Result<Vec<EventComment>> {
        let s = self.lock();
        let mut out: Vec<EventComment> = s
            .comments
            .iter()
            .filter(|c| filter.event_id.map_or(true, |e| c.event_id == e))
            .filter(|c| filter.user_id.map_or(true, |u| c.user_id == u))
            .filter(|c| filter.search.as_deref().map_or(true, |q| contains(&c.content, q)))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<EventComment>> {
        Ok(self.lock().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn create(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> anyhow::Result<EventComment> {
        Ok(self.seed_comment(event_id, user_id, content))
    }

    async fn update_content(
        &self,
        id: Uuid,
        content: &str,
    ) -> anyhow::Result<Option<EventComment>> {
        let mut s = self.lock();
        let now = s.tick();
        Ok(s.comments.iter_mut().find(|c| c.id == id).map(|c| {
            c.content = content.to_string();
            c.updated_at = now;
            c.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut s = self.lock();
        let before = s.comments.len();
        s.comments.retain(|c| c.id != id);
        Ok(before != s.comments.len())
    }
}

#[async_trait]
impl RoommateRepository for InMemoryStore {
    async fn list(&self, filter: &RoommateFilter) -> anyhow::Result<Vec<RoommatePost>> {
        let s = self.lock();
        let mut out: Vec<RoommatePost> = s
            .roommates
            .iter()
            .filter(|p| {
                filter.search.as_deref().map_or(true, |q| {
                    contains(&p.title, q) || contains(&p.description, q) || contains(&p.location, q)
                })
            })
            .filter(|p| filter.room_type.map_or(true, |t| p.room_type == t))
            .filter(|p| filter.preferred_gender.map_or(true, |g| p.preferred_gender == g))
            .filter(|p| filter.max_rent.map_or(true, |m| p.rent <= m))
            .filter(|p| filter.is_active.map_or(true, |a| p.is_active == a))
            .filter(|p| filter.user_id.map_or(true, |u| p.user_id == u))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<RoommatePost>> {
        Ok(self.lock().roommates.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, post: &NewRoommatePost) -> anyhow::Result<RoommatePost> {
        let mut s = self.lock();
        let now = s.tick();
        let created = RoommatePost {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            title: post.title.clone(),
            description: post.description.clone(),
            location: post.location.clone(),
            rent: post.rent,
            available_from: post.available_from,
            lease_duration: post.lease_duration,
            room_type: post.room_type,
            preferred_gender: post.preferred_gender,
            current_occupants: post.current_occupants,
            total_occupants: post.total_occupants,
            amenities: post.amenities,
            occupation: post.occupation,
            university: post.university.clone(),
            contact_number: post.contact_number.clone(),
            contact_email: post.contact_email.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        s.roommates.push(created.clone());
        Ok(created)
    }

    async fn update(&self, post: &RoommatePost) -> anyhow::Result<Option<RoommatePost>> {
        let mut s = self.lock();
        let now = s.tick();
        Ok(s.roommates.iter_mut().find(|p| p.id == post.id).map(|stored| {
            let keep = (stored.user_id, stored.created_at);
            *stored = post.clone();
            (stored.user_id, stored.created_at) = keep;
            stored.updated_at = now;
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.lock().delete_roommate(id))
    }
}

#[async_trait]
impl StoragePort for InMemoryStore {
    async fn store_image(
        &self,
        area: &str,
        owner_id: Uuid,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredBlob> {
        let mut s = self.lock();
        s.seq += 1;
        let key = format!(
            "{area}/{owner_id}/{}_{}",
            s.seq,
            original_filename.unwrap_or("upload")
        );
        s.blobs.insert(key.clone(), bytes.to_vec());
        Ok(StoredBlob {
            key,
            size: bytes.len() as i64,
            content_hash: format!("{:x}", Sha256::digest(bytes)),
        })
    }

    async fn read_bytes(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self.lock()
            .blobs
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no blob at {key}"))
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.lock().blobs.remove(key);
        Ok(())
    }
}
