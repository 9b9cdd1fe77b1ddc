/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum LockCommands {
    /// Single acquire attempt, exits 1 when the lock is held or the store fails
    TryLock {
        /// Lock name, stored as lock:<name>
        name: String,

        /// Validity window in milliseconds, default from the config file
        #[clap(short, long)]
        duration_ms: Option<u64>,
    },

    /// Single release attempt, succeeds when the lock is already free
    TryUnlock {
        /// Lock name
        name: String,
    },

    /// Wait for the lock, up to its validity window
    Lock {
        /// Lock name
        name: String,

        /// Validity window in milliseconds, default from the config file
        #[clap(short, long)]
        duration_ms: Option<u64>,

        /// Hold the lock this long, then release it
        #[clap(long)]
        hold_ms: Option<u64>,
    },

    /// Release the lock, retrying on store errors up to the validity window
    Unlock {
        /// Lock name
        name: String,

        /// Retry window in milliseconds, default from the config file
        #[clap(short, long)]
        duration_ms: Option<u64>,
    },
}
