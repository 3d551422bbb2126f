pub const SCHEMA: &str = r#"
-- Projects are the root of every other entity
CREATE TABLE IF NOT EXISTS projects (
    uid TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE TABLE IF NOT EXISTS assets (
    uid TEXT PRIMARY KEY,
    project_uid TEXT NOT NULL REFERENCES projects(uid) ON DELETE CASCADE,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT,

    UNIQUE(project_uid, name)
);

CREATE TABLE IF NOT EXISTS shots (
    uid TEXT PRIMARY KEY,
    project_uid TEXT NOT NULL REFERENCES projects(uid) ON DELETE CASCADE,
    seq TEXT NOT NULL,
    shot TEXT NOT NULL,
    frame_in INTEGER NOT NULL,
    frame_out INTEGER NOT NULL,
    fps REAL,
    colorspace TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT,

    UNIQUE(project_uid, seq, shot),
    CHECK(frame_out > frame_in)
);

-- Tasks reference an asset or a shot through (parent_type, parent_uid);
-- no foreign key backs the pair, the API boundary validates it
CREATE TABLE IF NOT EXISTS tasks (
    uid TEXT PRIMARY KEY,
    project_uid TEXT NOT NULL REFERENCES projects(uid) ON DELETE CASCADE,
    parent_type TEXT NOT NULL CHECK(parent_type IN ('asset','shot')),
    parent_uid TEXT NOT NULL,
    name TEXT NOT NULL,
    assignee TEXT,
    status TEXT NOT NULL DEFAULT 'WIP',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

-- vnum is assigned max+1 per task and never renumbered
CREATE TABLE IF NOT EXISTS versions (
    uid TEXT PRIMARY KEY,
    project_uid TEXT NOT NULL REFERENCES projects(uid) ON DELETE CASCADE,
    task_uid TEXT NOT NULL REFERENCES tasks(uid) ON DELETE CASCADE,
    vnum INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'draft',
    created_by TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT,

    UNIQUE(task_uid, vnum)
);

CREATE TABLE IF NOT EXISTS publishes (
    uid TEXT PRIMARY KEY,
    project_uid TEXT NOT NULL REFERENCES projects(uid) ON DELETE CASCADE,
    version_uid TEXT NOT NULL REFERENCES versions(uid) ON DELETE CASCADE,
    type TEXT NOT NULL,
    representation TEXT,
    path TEXT NOT NULL,
    meta TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE TABLE IF NOT EXISTS render_jobs (
    uid TEXT PRIMARY KEY,
    project_uid TEXT REFERENCES projects(uid) ON DELETE CASCADE,
    context TEXT NOT NULL DEFAULT '{}',
    adapter TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'queued'
        CHECK(status IN ('queued','running','succeeded','failed')),
    logs TEXT,
    submitted_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

-- Append-style audit records
CREATE TABLE IF NOT EXISTS events (
    uid TEXT PRIMARY KEY,
    project_uid TEXT REFERENCES projects(uid) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    payload TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

-- Bearer credentials; the raw key never persists
CREATE TABLE IF NOT EXISTS api_keys (
    uid TEXT PRIMARY KEY,
    key_hash TEXT NOT NULL,          -- argon2id hash with embedded salt
    key_lookup TEXT NOT NULL,        -- short prefix for fast lookup
    description TEXT,
    role TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0,
    expires_at TEXT,                 -- NULL = never
    created_at TEXT NOT NULL,
    last_used_at TEXT
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_assets_project ON assets(project_uid);
CREATE INDEX IF NOT EXISTS idx_shots_project ON shots(project_uid);
CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_uid);
CREATE INDEX IF NOT EXISTS idx_tasks_parent ON tasks(parent_type, parent_uid);
CREATE INDEX IF NOT EXISTS idx_versions_task ON versions(task_uid);
CREATE INDEX IF NOT EXISTS idx_versions_project ON versions(project_uid);
CREATE INDEX IF NOT EXISTS idx_publishes_version ON publishes(version_uid);
CREATE INDEX IF NOT EXISTS idx_publishes_project ON publishes(project_uid);
CREATE INDEX IF NOT EXISTS idx_render_jobs_project ON render_jobs(project_uid);
CREATE INDEX IF NOT EXISTS idx_events_project ON events(project_uid);
CREATE UNIQUE INDEX IF NOT EXISTS idx_api_keys_lookup ON api_keys(key_lookup);
"#;
