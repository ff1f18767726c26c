uuid_id!(Id);
