//! Built-in sample document behind "fill with sample data".

use crate::models::document::{
    CoverLetterData, DocumentInput, Education, FormData, ProfessionalExperience, Reference,
    TechnicalSkills, TechnicalSkillsRow,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn skills_row(category: &str, technologies: &str) -> TechnicalSkillsRow {
    TechnicalSkillsRow {
        category: category.to_string(),
        technologies: technologies.to_string(),
    }
}

fn job(
    position: &str,
    company: &str,
    start_year: &str,
    end_year: &str,
    key_accomplishments: &[&str],
    experience_summary: &[&str],
) -> ProfessionalExperience {
    ProfessionalExperience {
        position: position.to_string(),
        company: company.to_string(),
        start_year: start_year.to_string(),
        end_year: end_year.to_string(),
        start_month: None,
        end_month: None,
        key_accomplishments: strings(key_accomplishments),
        experience_summary: strings(experience_summary),
    }
}

pub fn sample_form_data() -> FormData {
    FormData {
        name: "Sarah Johnson".to_string(),
        professional_summary: "Experienced software engineer with 8+ years of expertise in full-stack development, cloud architecture, and team leadership. Proven track record of delivering scalable solutions and mentoring junior developers. Passionate about emerging technologies and driving innovation in fast-paced environments.".to_string(),
        skills_and_abilities: strings(&[
            "Full-stack web development with modern frameworks",
            "Cloud architecture and DevOps implementation",
            "Team leadership and project management",
            "Agile methodologies and continuous integration",
            "Database design and optimization",
        ]),
        include_technical_skills: true,
        technical_skills: TechnicalSkills {
            headers: strings(&["Skill Category", "Technologies/Tools"]),
            rows: vec![
                skills_row("Programming Languages", "JavaScript, TypeScript, Python, Java, C#"),
                skills_row("Frontend Technologies", "React, Vue.js, Angular, HTML5, CSS3, Tailwind CSS"),
                skills_row("Backend Technologies", "Node.js, Express, Django, Spring Boot, ASP.NET"),
                skills_row("Databases", "PostgreSQL, MongoDB, Redis, MySQL, DynamoDB"),
                skills_row("Cloud & DevOps", "AWS, Docker, Kubernetes, Jenkins, Terraform, GitHub Actions"),
                skills_row("Tools & Others", "Git, Jira, Figma, Postman, VS Code, IntelliJ IDEA"),
            ],
        },
        professional_experience: vec![
            job(
                "Senior Software Engineer",
                "TechCorp Solutions",
                "2020",
                "",
                &[
                    "Led development of microservices architecture serving 2M+ daily users",
                    "Reduced application load time by 40% through optimization initiatives",
                    "Mentored 6 junior developers and conducted technical interviews",
                    "Implemented CI/CD pipeline reducing deployment time by 60%",
                ],
                &[
                    "Spearhead the development of scalable web applications using React, Node.js, and AWS cloud services. Collaborate with cross-functional teams to deliver high-quality software solutions that meet business objectives and user requirements.",
                    "Drive technical decision-making for architecture improvements and technology stack upgrades. Lead code reviews, establish best practices, and ensure adherence to coding standards across the development team.",
                ],
            ),
            job(
                "Software Engineer",
                "InnovateTech Inc.",
                "2019",
                "2020",
                &[
                    "Developed REST APIs handling 500K+ requests per day",
                    "Improved database query performance by 50% through optimization",
                    "Collaborated with UX team to implement responsive web designs",
                    "Contributed to open-source projects and internal tool development",
                ],
                &[
                    "Built and maintained full-stack web applications using modern JavaScript frameworks and cloud technologies. Worked closely with product managers and designers to translate business requirements into technical solutions.",
                    "Participated in agile development processes, including sprint planning, daily standups, and retrospectives. Contributed to improving development workflows and team productivity through automation and tooling enhancements.",
                ],
            ),
            job(
                "Junior Developer",
                "StartupXYZ",
                "2017",
                "2019",
                &[
                    "Built responsive web interfaces using HTML, CSS, and JavaScript",
                    "Integrated third-party APIs and payment processing systems",
                    "Participated in debugging and troubleshooting production issues",
                    "Contributed to mobile app development using React Native",
                ],
                &[
                    "Gained hands-on experience in web development while working in a fast-paced startup environment. Learned to adapt quickly to changing requirements and prioritize tasks effectively to meet tight deadlines.",
                    "Developed strong problem-solving skills through debugging complex issues and implementing creative solutions. Built foundation in software engineering principles and collaborative development practices.",
                ],
            ),
        ],
        education: vec![
            Education {
                qualification: "Bachelor of Science in Computer Science".to_string(),
                institution: "University of Technology".to_string(),
                year_completed: "2017".to_string(),
            },
            Education {
                qualification: "AWS Certified Solutions Architect".to_string(),
                institution: "Amazon Web Services".to_string(),
                year_completed: "2021".to_string(),
            },
        ],
        include_hobbies: true,
        hobbies: strings(&[
            "Contributing to open-source projects and maintaining personal GitHub repositories with 500+ stars",
            "Photography and digital art creation, with work featured in local exhibitions",
            "Rock climbing and hiking, having completed several challenging multi-day trails",
            "Cooking international cuisines and experimenting with fusion recipes",
        ]),
        include_references: true,
        references: vec![
            Reference {
                name: "Michael Chen".to_string(),
                position: "Engineering Manager at TechCorp Solutions".to_string(),
                contact: "michael.chen@techcorp.com | (555) 123-4567".to_string(),
            },
            Reference {
                name: "Dr. Amanda Rodriguez".to_string(),
                position: "Computer Science Professor at University of Technology".to_string(),
                contact: "a.rodriguez@university.edu | (555) 987-6543".to_string(),
            },
            Reference {
                name: "James Wilson".to_string(),
                position: "CTO at InnovateTech Inc.".to_string(),
                contact: "james.wilson@innovatetech.com | (555) 456-7890".to_string(),
            },
        ],
    }
}

pub fn sample_cover_letter() -> CoverLetterData {
    CoverLetterData {
        recipient_name: "Ms. Jennifer Parker".to_string(),
        company: "TechVision Systems".to_string(),
        location: "San Francisco, CA".to_string(),
        position: "Senior Full-Stack Developer".to_string(),
        subtitle: "Senior Application Development Professional".to_string(),
        content: strings(&[
            "I am writing to express my strong interest in the Senior Full-Stack Developer position at TechVision Systems. With over 8 years of experience in software engineering and a proven track record of delivering scalable solutions, I am excited about the opportunity to contribute to your innovative team and help drive TechVision's mission forward.",
            "In my current role as Senior Software Engineer at TechCorp Solutions, I have successfully led the development of microservices architecture serving over 2 million daily users, while mentoring junior developers and implementing CI/CD pipelines that reduced deployment time by 60%. My expertise spans across modern frontend frameworks like React and Vue.js, backend technologies including Node.js and Python, and cloud platforms such as AWS. I am particularly drawn to TechVision's commitment to cutting-edge technology and believe my experience with cloud architecture and team leadership would be valuable assets to your organization.",
            "I would welcome the opportunity to discuss how my technical expertise, leadership experience, and passion for innovation can contribute to TechVision Systems' continued success. Thank you for considering my application, and I look forward to hearing from you soon.",
        ]),
    }
}

pub fn sample_document() -> DocumentInput {
    DocumentInput {
        form_data: sample_form_data(),
        cover_letter_data: Some(sample_cover_letter()),
    }
}
