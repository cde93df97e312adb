//! Database schema and migrations.
//!
//! Migrations are applied in order when the database is opened. The
//! schema_version table records which ones have run.

/// Database migrations.
///
/// Ids are UUIDs stored as 16-byte BLOBs, timestamps are RFC 3339 TEXT and
/// dates are `YYYY-MM-DD` TEXT.
pub const MIGRATIONS: &[&str] = &[
    // v1: dictionaries
    r#"
CREATE TABLE dict_app_statuses (
    id              INTEGER PRIMARY KEY,
    is_default      INTEGER NOT NULL DEFAULT 0,
    value           TEXT NOT NULL,
    display_value   TEXT
);

CREATE TABLE dict_doc_statuses (
    id              INTEGER PRIMARY KEY,
    is_default      INTEGER NOT NULL DEFAULT 0,
    value           TEXT NOT NULL,
    display_value   TEXT
);

CREATE TABLE dict_edu_doc_types (
    id              INTEGER PRIMARY KEY,
    value           TEXT NOT NULL,
    display_value   TEXT
);

CREATE TABLE dict_id_doc_types (
    id              INTEGER PRIMARY KEY,
    value           TEXT NOT NULL,
    display_value   TEXT
);

CREATE TABLE dict_edu_levels (
    id              INTEGER PRIMARY KEY,
    value           TEXT NOT NULL,
    display_value   TEXT
);

CREATE TABLE dict_nationalities (
    id              INTEGER PRIMARY KEY,
    value           TEXT NOT NULL,
    display_value   TEXT,
    sort_priority   INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE dict_regions (
    id              INTEGER PRIMARY KEY,
    region_id       INTEGER NOT NULL UNIQUE,
    value           TEXT NOT NULL,
    display_value   TEXT,
    sort_priority   INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE dict_town_types (
    id              INTEGER PRIMARY KEY,
    value           TEXT NOT NULL,
    display_value   TEXT
);

CREATE TABLE dict_genders (
    id              INTEGER PRIMARY KEY,
    value           TEXT NOT NULL,
    display_value   TEXT
);

CREATE TABLE college_majors (
    id              BLOB PRIMARY KEY,
    name            TEXT NOT NULL,
    prefix          TEXT NOT NULL,
    base            TEXT NOT NULL,
    name_official   TEXT NOT NULL,
    budget          INTEGER NOT NULL DEFAULT 0,
    code            TEXT NOT NULL
);
"#,
    // v2: dictionary seed data
    r#"
INSERT INTO dict_app_statuses (id, is_default, value, display_value) VALUES
    (1, 1, 'submitted', 'Подано'),
    (2, 0, 'accepted', 'Принято'),
    (3, 0, 'rejected', 'Отклонено');

INSERT INTO dict_doc_statuses (id, is_default, value, display_value) VALUES
    (1, 1, 'pending', 'На проверке'),
    (2, 0, 'verified', 'Проверено'),
    (3, 0, 'rejected', 'Отклонено');

INSERT INTO dict_edu_doc_types (id, value, display_value) VALUES
    (1, 'basic_general', 'Аттестат об основном общем образовании'),
    (2, 'secondary_general', 'Аттестат о среднем общем образовании'),
    (3, 'vocational', 'Диплом о среднем профессиональном образовании');

INSERT INTO dict_id_doc_types (id, value, display_value) VALUES
    (1, 'passport', 'Паспорт гражданина РФ'),
    (2, 'foreign_passport', 'Паспорт иностранного гражданина'),
    (3, 'birth_certificate', 'Свидетельство о рождении');

INSERT INTO dict_edu_levels (id, value, display_value) VALUES
    (1, 'grade_9', '9 классов'),
    (2, 'grade_11', '11 классов');

INSERT INTO dict_nationalities (id, value, display_value, sort_priority) VALUES
    (1, 'RU', 'Россия', 100),
    (2, 'BY', 'Беларусь', 10),
    (3, 'KZ', 'Казахстан', 10),
    (4, 'OTHER', 'Другое', 0);

INSERT INTO dict_regions (id, region_id, value, display_value, sort_priority) VALUES
    (1, 77, 'moscow', 'Москва', 100),
    (2, 50, 'moscow_oblast', 'Московская область', 90),
    (3, 78, 'saint_petersburg', 'Санкт-Петербург', 80),
    (4, 14, 'sakha', 'Республика Саха (Якутия)', 70);

INSERT INTO dict_town_types (id, value, display_value) VALUES
    (1, 'city', 'Город'),
    (2, 'town', 'Посёлок'),
    (3, 'village', 'Село');

INSERT INTO dict_genders (id, value, display_value) VALUES
    (1, 'male', 'Мужской'),
    (2, 'female', 'Женский');

INSERT INTO college_majors (id, name, prefix, base, name_official, budget, code) VALUES
    (X'0190f0a6b1c47a3e9f2b6d1c8e4a5b01', 'Programming', 'ИП', '9', 'Информационные системы и программирование', 1, '09.02.07'),
    (X'0190f0a6b1c47a3e9f2b6d1c8e4a5b02', 'Programming', 'ИП', '11', 'Информационные системы и программирование', 0, '09.02.07'),
    (X'0190f0a6b1c47a3e9f2b6d1c8e4a5b03', 'Networks', 'СА', '9', 'Сетевое и системное администрирование', 1, '09.02.06');
"#,
    // v3: users, credentials and tokens
    r#"
CREATE TABLE users (
    id          BLOB PRIMARY KEY,
    username    TEXT NOT NULL UNIQUE,
    email       TEXT NOT NULL UNIQUE,
    permissions INTEGER NOT NULL DEFAULT 0,
    verified    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

CREATE TABLE passwords (
    user_id     BLOB PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    hash        TEXT NOT NULL
);

CREATE TABLE auth_tokens (
    id          BLOB PRIMARY KEY,
    user_id     BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token_hash  TEXT NOT NULL UNIQUE,   -- SHA-256 hex of the secret
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

CREATE INDEX idx_auth_tokens_user ON auth_tokens(user_id);
"#,
    // v4: applicant profile
    r#"
CREATE TABLE user_details (
    user_id     BLOB PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    first_name  TEXT NOT NULL,
    middle_name TEXT NOT NULL,
    last_name   TEXT,
    gender_id   INTEGER NOT NULL REFERENCES dict_genders(id),
    birthday    TEXT NOT NULL,
    tel         TEXT NOT NULL,
    snils       TEXT,
    needs_dorm  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE user_addresses (
    user_id      BLOB PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    region_id    INTEGER NOT NULL REFERENCES dict_regions(id),
    town_type_id INTEGER NOT NULL REFERENCES dict_town_types(id),
    town         TEXT NOT NULL,
    address      TEXT NOT NULL,
    post_code    TEXT NOT NULL
);

CREATE TABLE user_files (
    id            BLOB PRIMARY KEY,
    created_at    TEXT NOT NULL,
    sha256        TEXT NOT NULL,
    user_id       BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    mime_type     TEXT NOT NULL,
    absolute_path TEXT NOT NULL
);

CREATE INDEX idx_user_files_user ON user_files(user_id);
"#,
    // v5: documents and applications
    r#"
CREATE TABLE identity_docs (
    id             BLOB PRIMARY KEY,
    created_at     TEXT NOT NULL,
    user_id        BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    status_id      INTEGER REFERENCES dict_doc_statuses(id) ON DELETE SET NULL,
    type_id        INTEGER NOT NULL REFERENCES dict_id_doc_types(id),
    series         TEXT NOT NULL,
    number         TEXT NOT NULL,
    issuer         TEXT NOT NULL,
    issued_at      TEXT NOT NULL,
    division_code  TEXT NOT NULL,
    nationality_id INTEGER NOT NULL REFERENCES dict_nationalities(id)
);

CREATE INDEX idx_identity_docs_user ON identity_docs(user_id);

CREATE TABLE education_docs (
    id               BLOB PRIMARY KEY,
    created_at       TEXT NOT NULL,
    user_id          BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    status_id        INTEGER REFERENCES dict_doc_statuses(id) ON DELETE SET NULL,
    type_id          INTEGER NOT NULL REFERENCES dict_edu_doc_types(id),
    series           TEXT NOT NULL,
    number           TEXT NOT NULL,
    issuer           TEXT NOT NULL,
    issued_at        TEXT NOT NULL,
    grad_year        INTEGER NOT NULL,
    issuer_region_id INTEGER NOT NULL REFERENCES dict_regions(id)
);

CREATE INDEX idx_education_docs_user ON education_docs(user_id);

CREATE TABLE applications (
    id           BLOB PRIMARY KEY,
    created_at   TEXT NOT NULL,
    user_id      BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    major_id     BLOB NOT NULL REFERENCES college_majors(id),
    edu_level_id INTEGER NOT NULL REFERENCES dict_edu_levels(id),
    status_id    INTEGER NOT NULL REFERENCES dict_app_statuses(id),
    priority     INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX idx_applications_user ON applications(user_id, priority);
"#,
];
